//! 往返定律的性质测试。
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：用 Proptest 构造“语法合法”的报文字节，验证 `serialize(parse(X)) == X`
//!   以及解析出的字段与生成时的组成部分一致；同时对由语法碎片随机拼接的输入验证：
//!   只要被接受，就必须逐字节还原。
//! - **设计手法 (How)**：生成器按产生式组织（token、URI、头部值、原因短语、主体），
//!   再按 Full-Request / Full-Response / Simple-Request 的线格式拼接。
//! - **边界 (What)**：方法 token 排除以字母串 `HTTP` 开头的情形，该前缀会被分派器判为响应，
//!   这正是文档记录的局部前瞻局限，而不是往返缺陷。

use proptest::prelude::*;
use spark_codec_http::{
    Message, MessageKind, ParseOptions, STATUS_CODE_CATALOG, StatusCodePolicy, parse_message,
    parse_message_with, parse_response,
};

fn token() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!#$%&'*+.^_`|~-]{1,12}"
}

fn method_token() -> impl Strategy<Value = String> {
    token().prop_filter("以 HTTP 字母串开头会被判为响应", |text| {
        let word: String = text
            .chars()
            .take_while(|ch| ch.is_ascii_alphabetic())
            .collect();
        word != "HTTP"
    })
}

fn quoted_method() -> impl Strategy<Value = String> {
    "[ !#-~]{0,10}".prop_map(|inner| format!("\"{inner}\""))
}

fn method() -> impl Strategy<Value = String> {
    prop_oneof![3 => method_token(), 1 => quoted_method()]
}

fn uri() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        any::<u8>().prop_filter("URI 不含空白", |b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n')),
        1..24,
    )
}

fn header() -> impl Strategy<Value = (String, Vec<u8>)> {
    (
        token(),
        proptest::collection::vec(any::<u8>().prop_filter("值止于 CR", |b| *b != b'\r'), 0..32),
    )
}

fn reason() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(
        any::<u8>().prop_filter("原因短语不含 CR/LF", |b| *b != b'\r' && *b != b'\n'),
        0..24,
    )
}

fn body() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..64)
}

fn version() -> impl Strategy<Value = (u32, u32)> {
    (0u32..100, 0u32..100)
}

fn push_headers(wire: &mut Vec<u8>, headers: &[(String, Vec<u8>)]) {
    for (name, value) in headers {
        wire.extend_from_slice(name.as_bytes());
        wire.push(b':');
        wire.extend_from_slice(value);
        wire.extend_from_slice(b"\r\n");
    }
    wire.extend_from_slice(b"\r\n");
}

proptest! {
    #[test]
    fn full_request_roundtrips(
        method in method(),
        uri in uri(),
        (major, minor) in version(),
        headers in proptest::collection::vec(header(), 0..6),
        body in body(),
    ) {
        let mut wire = Vec::new();
        wire.extend_from_slice(method.as_bytes());
        wire.push(b' ');
        wire.extend_from_slice(&uri);
        wire.extend_from_slice(format!(" HTTP/{major}.{minor}\r\n").as_bytes());
        push_headers(&mut wire, &headers);
        wire.extend_from_slice(&body);

        let message = parse_message(&wire).expect("生成的 Full-Request 应被接受");
        let Message::FullRequest(request) = &message else {
            panic!("应为 Full-Request: {message:?}");
        };
        prop_assert_eq!(request.request_line.method.as_bytes(), method.as_bytes());
        prop_assert_eq!(request.request_line.uri.as_bytes(), &uri[..]);
        prop_assert_eq!(request.headers.len(), headers.len());
        prop_assert_eq!(request.body.as_bytes(), &body[..]);
        prop_assert_eq!(&message.to_bytes()[..], &wire[..]);
    }

    #[test]
    fn full_response_roundtrips(
        code in proptest::sample::select(STATUS_CODE_CATALOG.to_vec()),
        (major, minor) in version(),
        reason in reason(),
        headers in proptest::collection::vec(header(), 0..6),
        body in body(),
    ) {
        let mut wire = format!("HTTP/{major}.{minor} {code} ").into_bytes();
        wire.extend_from_slice(&reason);
        wire.extend_from_slice(b"\r\n");
        push_headers(&mut wire, &headers);
        wire.extend_from_slice(&body);

        let message = parse_message(&wire).expect("生成的 Full-Response 应被接受");
        let Message::FullResponse(response) = &message else {
            panic!("应为 Full-Response: {message:?}");
        };
        prop_assert_eq!(response.status_line.code.as_u16(), code);
        prop_assert_eq!(response.status_line.reason.as_bytes(), &reason[..]);
        let names: Vec<&[u8]> = response.headers.iter().map(|h| h.name().as_bytes()).collect();
        let expected: Vec<&[u8]> = headers.iter().map(|(name, _)| name.as_bytes()).collect();
        prop_assert_eq!(names, expected);
        prop_assert_eq!(&message.to_bytes()[..], &wire[..]);
    }

    #[test]
    fn permissive_status_codes_roundtrip(code in 100u16..1000) {
        let wire = format!("HTTP/1.0 {code} X\r\n\r\n").into_bytes();
        let options = ParseOptions::with_status_codes(StatusCodePolicy::AnyThreeDigit);
        let message = parse_message_with(&wire, &options).expect("任意有效三位码应被接受");
        prop_assert_eq!(&message.to_bytes()[..], &wire[..]);
        prop_assert_eq!(
            parse_message(&wire).is_ok(),
            STATUS_CODE_CATALOG.contains(&code)
        );
    }

    #[test]
    fn simple_request_roundtrips(uri in uri()) {
        let mut wire = b"GET ".to_vec();
        wire.extend_from_slice(&uri);
        wire.extend_from_slice(b"\r\n");

        let message = parse_message(&wire).expect("生成的 Simple-Request 应被接受");
        prop_assert_eq!(message.kind(), MessageKind::SimpleRequest);
        prop_assert_eq!(&message.to_bytes()[..], &wire[..]);
    }

    #[test]
    fn simple_response_with_context_roundtrips(body in body()) {
        prop_assume!(!body.starts_with(b"HTTP"));
        let message = parse_response(&body).expect("响应上下文下任意字节都可解析");
        prop_assert_eq!(&message.to_bytes()[..], &body[..]);
    }

    #[test]
    fn accepted_fragment_soup_roundtrips(
        pieces in proptest::collection::vec(
            proptest::sample::select(vec![
                "GET", "POST", "HTTP", "/", "1", ".", "0", "200", "OK", " ", "\r", "\n",
                "\r\n", ":", "A", "\"", "\t", "x", "999",
            ]),
            0..24,
        )
    ) {
        let wire: Vec<u8> = pieces.concat().into_bytes();
        if let Ok(message) = parse_message(&wire) {
            prop_assert_eq!(&message.to_bytes()[..], &wire[..]);
            let reparsed = parse_message(&message.to_bytes()).expect("重新序列化的字节应仍被接受");
            prop_assert_eq!(reparsed, message);
        }
    }
}
