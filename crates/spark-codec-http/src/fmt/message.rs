//! 报文级序列化。
//!
//! 四种形态与 [`Message`] 的分支一一对应，穷尽匹配，新增形态时编译器会指出遗漏的写出逻辑。

use bytes::BufMut;

use crate::types::{EntityBody, Header, Headers, Message};

use super::{
    CRLF,
    line::{write_request_line, write_status_line},
};

/// 写出单个头部：`name ":" value CRLF`。
pub fn write_header<B: BufMut>(buf: &mut B, header: &Header) {
    buf.put_slice(header.name().as_bytes());
    buf.put_u8(b':');
    buf.put_slice(header.value());
    buf.put_slice(CRLF);
}

/// 按原始顺序写出全部头部，并以空行结束头部区。
pub fn write_headers<B: BufMut>(buf: &mut B, headers: &Headers) {
    for header in headers {
        write_header(buf, header);
    }
    buf.put_slice(CRLF);
}

/// 原样写出主体。
pub fn write_body<B: BufMut>(buf: &mut B, body: &EntityBody) {
    buf.put_slice(body.as_bytes());
}

/// 写出完整的 [`Message`]。
pub fn write_message<B: BufMut>(buf: &mut B, message: &Message) {
    match message {
        Message::SimpleRequest(request) => {
            buf.put_slice(b"GET ");
            buf.put_slice(request.uri.as_bytes());
            buf.put_slice(CRLF);
        }
        Message::FullRequest(request) => {
            write_request_line(buf, &request.request_line);
            write_headers(buf, &request.headers);
            write_body(buf, &request.body);
        }
        Message::FullResponse(response) => {
            write_status_line(buf, &response.status_line);
            write_headers(buf, &response.headers);
            write_body(buf, &response.body);
        }
        Message::SimpleResponse(response) => write_body(buf, &response.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RequestUri, SimpleRequest, SimpleResponse, Token};
    use alloc::vec::Vec;

    #[test]
    fn simple_request_has_constant_method() {
        let message = Message::SimpleRequest(SimpleRequest {
            uri: RequestUri::new("/index.html").unwrap(),
        });
        let mut buf = Vec::new();
        write_message(&mut buf, &message);
        assert_eq!(buf, b"GET /index.html\r\n");
    }

    #[test]
    fn empty_simple_response_is_zero_bytes() {
        let message = Message::SimpleResponse(SimpleResponse::default());
        assert!(message.to_bytes().is_empty());
    }

    #[test]
    fn headers_end_with_blank_line() {
        let headers: Headers = [("A", " 1"), ("B", " 2")]
            .into_iter()
            .filter_map(|(name, value)| Header::new(Token::new(name)?, value))
            .collect();
        let mut buf = Vec::new();
        write_headers(&mut buf, &headers);
        assert_eq!(buf, b"A: 1\r\nB: 2\r\n\r\n");
    }
}
