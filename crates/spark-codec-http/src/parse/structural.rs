//! 结构产生式：Request-Line、Status-Line、头部与实体主体。
//!
//! ## 组成（What）
//! - `Request-Line := Method SP Request-URI SP HTTP-Version CRLF`
//! - `Status-Line := HTTP-Version SP Status-Code SP Reason-Phrase CRLF`
//! - `HTTP-header := field-name ":" [ field-value ] CRLF`，头部区以一个空行结束；
//! - `Entity-Body := *OCTET`，消费剩余全部输入。
//!
//! ## 风险提示（Trade-offs）
//! - 实体主体不受长度头约束：输入总是完整缓冲，主体即“剩下的所有字节”。

use bytes::Bytes;

use crate::{
    error::GrammarViolation,
    lex::Lexer,
    options::StatusCodePolicy,
    types::{EntityBody, Header, Headers, RequestLine, StatusLine},
};

use super::primitive::{http_version, method, reason_phrase, request_uri, status_code, token};

/// 消费 `CR LF`。
pub fn crlf(lexer: &mut Lexer<'_>) -> Result<(), GrammarViolation> {
    lexer.expect(b"\r")?;
    lexer.expect(b"\n")?;
    Ok(())
}

/// 解析完整请求行（含结尾 `CRLF`）。
pub fn request_line(lexer: &mut Lexer<'_>) -> Result<RequestLine, GrammarViolation> {
    let method = method(lexer)?;
    lexer.expect(b" ")?;
    let uri = request_uri(lexer)?;
    lexer.expect(b" ")?;
    let version = http_version(lexer)?;
    crlf(lexer)?;
    Ok(RequestLine {
        method,
        uri,
        version,
    })
}

/// 解析完整状态行（含结尾 `CRLF`）。
pub fn status_line(
    lexer: &mut Lexer<'_>,
    policy: StatusCodePolicy,
) -> Result<StatusLine, GrammarViolation> {
    let version = http_version(lexer)?;
    lexer.expect(b" ")?;
    let code = status_code(lexer, policy)?;
    lexer.expect(b" ")?;
    let reason = reason_phrase(lexer);
    crlf(lexer)?;
    Ok(StatusLine {
        version,
        code,
        reason,
    })
}

/// 解析单个头部；值为冒号之后直到 `CR` 的原文。
pub fn header(lexer: &mut Lexer<'_>) -> Result<Header, GrammarViolation> {
    let name = token(lexer)?;
    lexer.expect(b":")?;

    let start = lexer.peek().offset();
    while !lexer.peek().is_end() && !lexer.peek().is(b"\r") {
        lexer.advance();
    }
    let value = Bytes::copy_from_slice(lexer.consumed_since(start));

    crlf(lexer)?;
    Ok(Header::from_parsed(name, value))
}

/// 解析零个或多个头部，直到空行 `CRLF`；保持输入顺序。
pub fn headers(lexer: &mut Lexer<'_>) -> Result<Headers, GrammarViolation> {
    let mut headers = Headers::new();
    while !lexer.peek().is(b"\r") {
        headers.push(header(lexer)?);
    }
    crlf(lexer)?;
    Ok(headers)
}

/// 消费剩余全部输入作为实体主体，永不失败。
pub fn entity_body(lexer: &mut Lexer<'_>) -> EntityBody {
    EntityBody::new(Bytes::copy_from_slice(lexer.take_rest()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpVersion;

    #[test]
    fn request_line_components() {
        let mut lexer = Lexer::new(b"POST /submit HTTP/1.0\r\nrest");
        let line = request_line(&mut lexer).unwrap();
        assert_eq!(line.method, "POST");
        assert_eq!(line.uri, "/submit");
        assert_eq!(line.version, HttpVersion::HTTP_10);
        assert_eq!(lexer.take_rest(), b"rest");
    }

    #[test]
    fn status_line_with_empty_reason() {
        let mut lexer = Lexer::new(b"HTTP/1.0 204 \r\n");
        let line = status_line(&mut lexer, StatusCodePolicy::Catalog).unwrap();
        assert_eq!(line.code.as_u16(), 204);
        assert!(line.reason.as_bytes().is_empty());
        assert!(lexer.peek().is_end());
    }

    #[test]
    fn status_line_requires_space_before_reason() {
        let err = status_line(&mut Lexer::new(b"HTTP/1.0 200\r\n"), StatusCodePolicy::Catalog)
            .unwrap_err();
        assert_eq!(err.expected(), "<SP>");
        assert_eq!(err.offset(), 12);
    }

    #[test]
    fn header_value_is_raw_text_up_to_cr() {
        let mut lexer = Lexer::new(b"Content-Type: text/html; charset=x \r\n");
        let header = header(&mut lexer).unwrap();
        assert_eq!(header.name(), "Content-Type");
        assert_eq!(header.value(), b" text/html; charset=x ");
    }

    #[test]
    fn header_without_colon_fails() {
        let err = header(&mut Lexer::new(b"Broken\r\n")).unwrap_err();
        assert_eq!(err.expected(), ":");
    }

    #[test]
    fn headers_preserve_order_and_consume_blank_line() {
        let mut lexer = Lexer::new(b"B: 2\r\nA: 1\r\nB: 3\r\n\r\nbody");
        let headers = headers(&mut lexer).unwrap();
        let names: alloc::vec::Vec<_> = headers.iter().map(|h| h.name().as_bytes()).collect();
        assert_eq!(names, [&b"B"[..], &b"A"[..], &b"B"[..]]);
        assert_eq!(entity_body(&mut lexer), "body");
    }

    #[test]
    fn headers_without_terminating_blank_line_fail() {
        let err = headers(&mut Lexer::new(b"A: 1\r\n")).unwrap_err();
        assert_eq!(err.expected(), "token");
        let err = headers(&mut Lexer::new(b"A: 1")).unwrap_err();
        assert_eq!(err.expected(), "<CR>");
    }
}
