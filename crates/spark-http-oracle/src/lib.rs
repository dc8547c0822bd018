//! `spark-http-oracle`：把往返判定包装成命令行工具的薄壳。
//!
//! # 设计动机（Why）
//! - 报文生成器与外部 fuzz 平台通常以“文件进、退出码出”的方式集成，需要一个不写 Rust 也能调用的入口。
//! - 解析、序列化、比对全部委托给 `spark-codec-http`，本 crate 只负责获取缓冲、加载配置与汇报结果。
//!
//! # 工作方式（How）
//! 1. [`Invocation::from_args`] 解析命令行；
//! 2. [`HarnessConfig::load`] 读取可选的 TOML 配置；
//! 3. [`run`] 在内存缓冲上执行选定入口并比对，得到 [`Outcome`]；
//! 4. [`Outcome::report`] 渲染报告，[`Outcome::exit_code`] 给出退出码。
//!
//! # 使用契约（What）
//! - 退出码：`0` 往返成功；`1` 语法违例；`2` 重新序列化结果与原文不一致。
//! - 成功报告格式固定为 `---Message begins---`、重新生成的字节、`---Message ends---`、`OK`；
//!   两个标记之间恰为重新生成的字节，不追加换行。

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, bail};
use bytes::Bytes;
use serde::Deserialize;
use spark_codec_http::{
    GrammarViolation, Message, MessageKind, ParseOptions, RoundTripError, check_regenerated,
    parse_message_with, parse_request, parse_response_with,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 命令行用法说明。
pub const USAGE: &str =
    "usage: spark-http-oracle [--config <file>] [--mode message|request|response] [<input-file>]";

/// 选择解析入口。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// 无方向上下文，四种形态由分派器择一。
    #[default]
    Message,
    /// 已知输入是请求。
    Request,
    /// 已知输入是响应。
    Response,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "message" => Ok(Self::Message),
            "request" => Ok(Self::Request),
            "response" => Ok(Self::Response),
            other => bail!("unknown mode `{other}`, expected message, request or response"),
        }
    }
}

/// 配置文件内容。
///
/// 解析策略字段直接平铺在顶层，例如 `status-codes = "any-three-digit"`；
/// `mode` 仅在命令行未显式给出时生效。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HarnessConfig {
    /// 解析选项。
    #[serde(flatten)]
    pub parse: ParseOptions,
    /// 默认解析入口。
    pub mode: Option<Mode>,
}

impl HarnessConfig {
    /// 从 TOML 文本解析配置。
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid harness configuration")
    }

    /// 读取并解析配置文件。
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in config file {}", path.display()))
    }
}

/// 一次调用的命令行参数。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    /// `--config` 指定的配置文件。
    pub config: Option<PathBuf>,
    /// `--mode` 指定的入口；缺省时回退到配置文件，再回退到 [`Mode::Message`]。
    pub mode: Option<Mode>,
    /// 输入文件；缺省读取标准输入。
    pub input: Option<PathBuf>,
}

impl Invocation {
    /// 解析不含程序名的参数序列。
    pub fn from_args<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut invocation = Self::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config requires a path")?;
                    invocation.config = Some(PathBuf::from(path));
                }
                "--mode" => {
                    let mode = args.next().context("--mode requires a value")?;
                    invocation.mode = Some(mode.parse()?);
                }
                flag if flag.starts_with("--") => bail!("unknown option `{flag}`\n{USAGE}"),
                path => {
                    if invocation.input.is_some() {
                        bail!("more than one input file given\n{USAGE}");
                    }
                    invocation.input = Some(PathBuf::from(path));
                }
            }
        }
        Ok(invocation)
    }

    /// 加载配置并确定最终入口，返回 `(mode, options)`。
    pub fn resolve(&self) -> anyhow::Result<(Mode, ParseOptions)> {
        let config = match &self.config {
            Some(path) => HarnessConfig::load(path)?,
            None => HarnessConfig::default(),
        };
        let mode = self.mode.or(config.mode).unwrap_or_default();
        Ok((mode, config.parse))
    }

    /// 读取整个输入缓冲。
    pub fn read_input(&self) -> anyhow::Result<Vec<u8>> {
        match &self.input {
            Some(path) => fs::read(path)
                .with_context(|| format!("failed to read input file {}", path.display())),
            None => {
                let mut buffer = Vec::new();
                io::Read::read_to_end(&mut io::stdin().lock(), &mut buffer)
                    .context("failed to read standard input")?;
                Ok(buffer)
            }
        }
    }
}

/// 判定结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 输入被接受，且重新序列化与原文逐字节一致。
    Accepted {
        /// 报文形态。
        kind: MessageKind,
        /// 重新序列化得到的字节。
        regenerated: Bytes,
    },
    /// 输入未被语法接受。
    Violation(GrammarViolation),
    /// 输入被接受，但重新序列化结果不同。
    Mismatch {
        /// 比对错误，携带首个分歧偏移与两侧长度。
        error: RoundTripError,
        /// 重新序列化得到的字节。
        regenerated: Bytes,
    },
}

impl Outcome {
    /// 进程退出码。
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Accepted { .. } => 0,
            Self::Violation(_) => 1,
            Self::Mismatch { .. } => 2,
        }
    }

    /// 将报告写入 `out`。
    pub fn report(&self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Accepted { regenerated, .. } => {
                write_framed(out, regenerated)?;
                writeln!(out, "OK")
            }
            Self::Violation(violation) => writeln!(out, "grammar violation: {violation}"),
            Self::Mismatch { error, regenerated } => {
                write_framed(out, regenerated)?;
                writeln!(out, "MISMATCH: {error}")
            }
        }
    }
}

fn write_framed(out: &mut impl Write, regenerated: &[u8]) -> io::Result<()> {
    writeln!(out, "---Message begins---")?;
    out.write_all(regenerated)?;
    writeln!(out, "---Message ends---")
}

/// 在内存缓冲上执行一次往返判定。
pub fn run(input: &[u8], mode: Mode, options: &ParseOptions) -> Outcome {
    let parsed = match mode {
        Mode::Message => parse_message_with(input, options),
        Mode::Request => parse_request(input),
        Mode::Response => parse_response_with(input, options),
    };
    let message = match parsed {
        Ok(message) => message,
        Err(violation) => {
            info!(?mode, %violation, "input rejected");
            return Outcome::Violation(violation);
        }
    };
    judge(input, &message)
}

fn judge(input: &[u8], message: &Message) -> Outcome {
    let regenerated = message.to_bytes();
    match check_regenerated(input, message) {
        Ok(()) => {
            debug!(kind = message.kind().as_str(), len = input.len(), "round-trip ok");
            Outcome::Accepted {
                kind: message.kind(),
                regenerated,
            }
        }
        Err(error) => Outcome::Mismatch { error, regenerated },
    }
}

/// 构建日志过滤器：优先读取 `RUST_LOG`，否则默认 `info`。
pub fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 安装全局 `fmt` 订阅者，日志写入标准错误，避免污染报告。
///
/// 重复安装时保持已有订阅者不变。
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter())
        .with_writer(io::stderr)
        .try_init();
}
