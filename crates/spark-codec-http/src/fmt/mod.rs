//! 序列化模块入口。
//!
//! ## 模块目标（Why）
//! - 作为解析的精确逆运算：对每个产生式输出一次接受性解析所消费的全部字节。
//! - 固定分隔符（`SP`、`CRLF`、冒号、`HTTP/` 前缀）以常量写出；其余内容逐字节取自存储字段，
//!   包括 quoted-string 值内保留的引号。
//!
//! ## 结构概览（What）
//! - `line`：版本、请求行、状态行；
//! - `message`：头部、主体与四种报文形态。
//!
//! ## 使用方式（How）
//! - 常用场景调用 [`write_message`] 或 [`Message::to_bytes`](crate::Message::to_bytes)；
//! - 写入目标是任意 [`bytes::BufMut`]，可以是 `Vec<u8>` 也可以是 `BytesMut`。

mod line;
mod message;

pub use line::{write_request_line, write_status_line, write_version};
pub use message::{write_body, write_header, write_headers, write_message};

use bytes::{Bytes, BytesMut};

use crate::types::Message;

pub(crate) const CRLF: &[u8] = b"\r\n";

/// 序列化为独立的 [`Bytes`]。
pub fn to_bytes(message: &Message) -> Bytes {
    let mut buf = BytesMut::with_capacity(encoded_len_hint(message));
    write_message(&mut buf, message);
    buf.freeze()
}

/// 预估容量，只用于一次性分配，不要求精确。
fn encoded_len_hint(message: &Message) -> usize {
    const LINE: usize = 64;
    let headers = message
        .headers()
        .map_or(0, |headers| {
            headers
                .iter()
                .map(|header| header.name().as_bytes().len() + header.value().len() + 3)
                .sum()
        });
    let body = message.body().map_or(0, |body| body.len());
    LINE + headers + body
}
