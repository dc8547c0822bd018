//! spark-http-fuzz 公共支持库。
//!
//! # 教案式定位
//! - **Why**：fuzz target 与语料回放测试共享同一判定逻辑，CI 用普通 `cargo test` 即可复现 libFuzzer 发现的样本。
//! - **What**：[`check_roundtrip`] 对任意字节执行往返判定；[`MessageSpec`] 是结构化 target 的输入模型，
//!   负责把任意数据整形为语法合法的报文字节。
//! - **How**：被拒绝的输入直接忽略；被接受却无法逐字节还原的输入触发 panic，交由 libFuzzer 记录。

use arbitrary::Arbitrary;
use spark_codec_http::{
    ParseOptions, RoundTripError, StatusCodePolicy, check_regenerated, parse_message,
    parse_response, verify_roundtrip_with,
};

/// 在两种状态码策略与响应方向入口下执行往返判定。
///
/// # Panics
/// 当输入被接受但重新序列化结果与原文不同，或序列化结果无法被再次接受时 panic。
pub fn check_roundtrip(data: &[u8]) {
    for policy in [StatusCodePolicy::Catalog, StatusCodePolicy::AnyThreeDigit] {
        let options = ParseOptions::with_status_codes(policy);
        match verify_roundtrip_with(data, &options) {
            Ok(message) => {
                let again = parse_message(&message.to_bytes());
                if policy == StatusCodePolicy::Catalog {
                    assert_eq!(again.as_ref(), Ok(&message), "重新解析结果必须一致");
                }
            }
            Err(RoundTripError::Grammar(_)) => {}
            Err(mismatch) => panic!("往返不一致 ({policy:?}): {mismatch}"),
        }
    }

    if let Ok(message) = parse_response(data) {
        if let Err(mismatch) = check_regenerated(data, &message) {
            panic!("响应方向往返不一致: {mismatch}");
        }
    }
}

/// 结构化报文规格：由 fuzzer 生成字段，再按线格式拼接。
#[derive(Debug, Arbitrary)]
pub enum MessageSpec {
    /// `GET <uri> CRLF`。
    SimpleRequest {
        /// 请求 URI 原料。
        uri: Vec<u8>,
    },
    /// 请求行 + 头部 + 主体。
    FullRequest {
        /// 方法原料。
        method: Vec<u8>,
        /// 方法是否使用带引号写法。
        quoted: bool,
        /// 请求 URI 原料。
        uri: Vec<u8>,
        /// 版本号。
        version: (u8, u8),
        /// 头部原料。
        headers: Vec<(Vec<u8>, Vec<u8>)>,
        /// 主体。
        body: Vec<u8>,
    },
    /// 状态行 + 头部 + 主体。
    FullResponse {
        /// 版本号。
        version: (u8, u8),
        /// 状态码原料，会被折算到 100..=999。
        code: u16,
        /// 原因短语原料。
        reason: Vec<u8>,
        /// 头部原料。
        headers: Vec<(Vec<u8>, Vec<u8>)>,
        /// 主体。
        body: Vec<u8>,
    },
}

impl MessageSpec {
    /// 渲染为语法合法的线格式字节。
    pub fn render(&self) -> Vec<u8> {
        let mut wire = Vec::new();
        match self {
            Self::SimpleRequest { uri } => {
                wire.extend_from_slice(b"GET ");
                wire.extend_from_slice(&uri_bytes(uri));
                wire.extend_from_slice(b"\r\n");
            }
            Self::FullRequest {
                method,
                quoted,
                uri,
                version,
                headers,
                body,
            } => {
                if *quoted {
                    wire.push(b'"');
                    wire.extend(method.iter().copied().filter(|b| is_qdtext(*b)));
                    wire.push(b'"');
                } else {
                    wire.extend_from_slice(&method_token(method));
                }
                wire.push(b' ');
                wire.extend_from_slice(&uri_bytes(uri));
                wire.extend_from_slice(format!(" HTTP/{}.{}\r\n", version.0, version.1).as_bytes());
                push_headers(&mut wire, headers);
                wire.extend_from_slice(body);
            }
            Self::FullResponse {
                version,
                code,
                reason,
                headers,
                body,
            } => {
                let code = 100 + code % 900;
                wire.extend_from_slice(
                    format!("HTTP/{}.{} {code} ", version.0, version.1).as_bytes(),
                );
                wire.extend(reason.iter().copied().filter(|b| *b != b'\r' && *b != b'\n'));
                wire.extend_from_slice(b"\r\n");
                push_headers(&mut wire, headers);
                wire.extend_from_slice(body);
            }
        }
        wire
    }
}

fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&byte)
}

fn is_qdtext(byte: u8) -> bool {
    byte != b'"' && byte != b'\r' && byte != b'\n' && byte != 0x7f && (byte >= 0x20 || byte == b'\t')
}

fn token_bytes(raw: &[u8]) -> Vec<u8> {
    let token: Vec<u8> = raw.iter().copied().filter(|b| is_token_byte(*b)).collect();
    if token.is_empty() { b"X".to_vec() } else { token }
}

fn method_token(raw: &[u8]) -> Vec<u8> {
    let mut token = token_bytes(raw);
    if token.starts_with(b"HTTP") {
        token.insert(0, b'X');
    }
    token
}

fn uri_bytes(raw: &[u8]) -> Vec<u8> {
    let uri: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .collect();
    if uri.is_empty() { b"/".to_vec() } else { uri }
}

fn push_headers(wire: &mut Vec<u8>, headers: &[(Vec<u8>, Vec<u8>)]) {
    for (name, value) in headers {
        wire.extend_from_slice(&token_bytes(name));
        wire.push(b':');
        wire.extend(value.iter().copied().filter(|b| *b != b'\r'));
        wire.extend_from_slice(b"\r\n");
    }
    wire.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_codec_http::parse_message_with;

    #[test]
    fn rendered_specs_are_accepted() {
        let specs = [
            MessageSpec::SimpleRequest { uri: Vec::new() },
            MessageSpec::FullRequest {
                method: b"HTTP\x00".to_vec(),
                quoted: false,
                uri: b" a b ".to_vec(),
                version: (1, 0),
                headers: vec![(b"(".to_vec(), b"v\r".to_vec())],
                body: b"\r\n".to_vec(),
            },
            MessageSpec::FullRequest {
                method: b"\"Q\"\x7f\t".to_vec(),
                quoted: true,
                uri: b"/".to_vec(),
                version: (0, 9),
                headers: Vec::new(),
                body: Vec::new(),
            },
            MessageSpec::FullResponse {
                version: (1, 0),
                code: 0,
                reason: b"Con\rtinue\n".to_vec(),
                headers: vec![(b"Server".to_vec(), b" x".to_vec())],
                body: b"HTTP/1.0".to_vec(),
            },
        ];
        let options = ParseOptions::with_status_codes(StatusCodePolicy::AnyThreeDigit);
        for spec in specs {
            let wire = spec.render();
            let message = parse_message_with(&wire, &options)
                .unwrap_or_else(|err| panic!("{spec:?} 渲染结果应被接受: {err}"));
            assert_eq!(message.to_bytes(), wire);
            check_roundtrip(&wire);
        }
    }
}
