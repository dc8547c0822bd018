//! 往返校验：解析、重新序列化并与原文逐字节比对。
//!
//! ## 模块目的（Why）
//! - 本 crate 的主要用途是作为报文生成器或模糊测试器的判定器：
//!   对任意被语法接受的输入 `X`，`serialize(parse(X)) == X` 必须成立。
//! - 把比对逻辑集中在一处，fuzz 目标、命令行工具与测试共享同一判定。

use bytes::BytesMut;
use tracing::warn;

use crate::{
    error::RoundTripError,
    fmt::write_message,
    options::ParseOptions,
    parse::parse_message_with,
    types::Message,
};

/// 以默认选项执行往返校验，成功时返回解析得到的报文树。
pub fn verify_roundtrip(input: &[u8]) -> Result<Message, RoundTripError> {
    verify_roundtrip_with(input, &ParseOptions::default())
}

/// 以给定选项执行往返校验。
pub fn verify_roundtrip_with(
    input: &[u8],
    options: &ParseOptions,
) -> Result<Message, RoundTripError> {
    let message = parse_message_with(input, options)?;
    check_regenerated(input, &message)?;
    Ok(message)
}

/// 对已解析的报文做比对，供使用方向化入口（`parse_request`/`parse_response`）的调用方复用。
pub fn check_regenerated(input: &[u8], message: &Message) -> Result<(), RoundTripError> {
    let mut regenerated = BytesMut::with_capacity(input.len());
    write_message(&mut regenerated, message);

    match first_divergence(input, &regenerated) {
        None => Ok(()),
        Some(offset) => {
            warn!(
                offset,
                original_len = input.len(),
                regenerated_len = regenerated.len(),
                kind = message.kind().as_str(),
                "regenerated message diverges from input"
            );
            Err(RoundTripError::Mismatch {
                offset,
                original_len: input.len(),
                regenerated_len: regenerated.len(),
            })
        }
    }
}

fn first_divergence(left: &[u8], right: &[u8]) -> Option<usize> {
    left.iter()
        .zip(right)
        .position(|(a, b)| a != b)
        .or_else(|| (left.len() != right.len()).then(|| left.len().min(right.len())))
}
