//! `spark-http-oracle` 可执行入口：读取缓冲、判定、汇报并以约定退出码结束。

use std::{io, process::ExitCode};

use anyhow::Context;
use spark_http_oracle::{Invocation, init_tracing, run};

fn main() -> ExitCode {
    init_tracing();
    match execute() {
        Ok(code) => code,
        Err(error) => {
            eprintln!("spark-http-oracle: {error:#}");
            ExitCode::from(64)
        }
    }
}

fn execute() -> anyhow::Result<ExitCode> {
    let invocation = Invocation::from_args(std::env::args().skip(1))?;
    let (mode, options) = invocation.resolve()?;
    let input = invocation.read_input()?;

    let outcome = run(&input, mode, &options);
    let mut stdout = io::stdout().lock();
    outcome
        .report(&mut stdout)
        .context("failed to write report")?;

    let code = u8::try_from(outcome.exit_code()).unwrap_or(1);
    Ok(ExitCode::from(code))
}
