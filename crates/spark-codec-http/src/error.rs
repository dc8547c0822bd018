//! 错误类型模块。
//!
//! ## 模块目的（Why）
//! - 语法层只有一种失败：[`GrammarViolation`]，描述“在某个位置期望的字面量或产生式”。
//! - 回放校验（`oracle`）额外需要区分“语法拒绝”与“序列化结果与原文不一致”，后者意味着本 crate 自身缺陷。
//!
//! ## 使用契约（What）
//! - 解析 API 返回 [`GrammarViolation`]；[`verify_roundtrip`](crate::verify_roundtrip) 返回 [`RoundTripError`]。
//! - 错误不持有输入缓冲的引用，可安全复制到日志或跨线程传递。
//!
//! ## 实现策略（How）
//! - `expected` 字段在构造时即完成符号化渲染（`<SP>`/`<CR>`/`<LF>` 等），展示阶段不再触碰原始控制字节。
//! - 借助 `thiserror` 派生 `Display`/`Error`，关闭默认特性以保持 `no_std + alloc` 可用。

use alloc::{borrow::Cow, string::String};

use thiserror::Error;

/// 语法违例：某个字面量或产生式在当前位置未被满足。
///
/// # 教案式说明
/// - **意图（Why）**：解析在首个违例处立即终止且不返回部分结果，调用方只需要知道“期望什么、在哪里”。
/// - **契约（What）**：`expected` 为人类可读的期望描述，空白与控制字符已替换为符号名；
///   `offset` 为失败时前瞻 token 在输入中的起始字节偏移。
/// - **权衡（Trade-offs）**：使用 `Cow<'static, str>` 让固定字面量零分配，仅符号化的动态描述才分配。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected \"{expected}\" at byte {offset}")]
pub struct GrammarViolation {
    expected: Cow<'static, str>,
    offset: usize,
}

impl GrammarViolation {
    /// 构造违例，`expected` 应已是符号化后的文本。
    pub fn new(expected: impl Into<Cow<'static, str>>, offset: usize) -> Self {
        Self {
            expected: expected.into(),
            offset,
        }
    }

    /// 期望的字面量或产生式名称。
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// 违例发生时前瞻 token 的起始偏移。
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// 回放校验失败的原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundTripError {
    /// 输入未被语法接受。
    #[error("grammar violation: {0}")]
    Grammar(#[from] GrammarViolation),
    /// 输入被接受，但重新序列化的字节与原文不同。
    ///
    /// 语法接受的输入不应出现该变体；一旦出现，说明序列化器不是解析器的逆。
    #[error(
        "regenerated bytes diverge at byte {offset} (original {original_len} bytes, regenerated {regenerated_len} bytes)"
    )]
    Mismatch {
        /// 第一个不同字节的偏移；若一方是另一方的前缀，则为较短一方的长度。
        offset: usize,
        /// 原始输入长度。
        original_len: usize,
        /// 重新生成的字节长度。
        regenerated_len: usize,
    },
}

/// 将期望文本渲染为诊断用符号，空白与控制字符不以原始字节出现。
pub(crate) fn symbolic(text: &[u8]) -> Cow<'static, str> {
    match text {
        b"" => Cow::Borrowed("<EOF>"),
        b" " => Cow::Borrowed("<SP>"),
        b"\t" => Cow::Borrowed("<HT>"),
        b"\r" => Cow::Borrowed("<CR>"),
        b"\n" => Cow::Borrowed("<LF>"),
        _ => {
            let mut rendered = String::with_capacity(text.len());
            for &byte in text {
                if byte.is_ascii_graphic() || byte == b' ' {
                    rendered.push(char::from(byte));
                } else {
                    rendered.push_str(&alloc::format!("<0x{byte:02X}>"));
                }
            }
            Cow::Owned(rendered)
        }
    }
}
