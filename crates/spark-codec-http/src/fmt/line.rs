//! 起始行序列化。

use bytes::BufMut;

use crate::types::{HttpVersion, RequestLine, StatusLine};

use super::CRLF;

/// 写出 `HTTP/<major>.<minor>`。
pub fn write_version<B: BufMut>(buf: &mut B, version: HttpVersion) {
    buf.put_slice(b"HTTP/");
    put_decimal(buf, version.major);
    buf.put_u8(b'.');
    put_decimal(buf, version.minor);
}

/// 写出请求行，含结尾 `CRLF`。
pub fn write_request_line<B: BufMut>(buf: &mut B, line: &RequestLine) {
    buf.put_slice(line.method.as_bytes());
    buf.put_u8(b' ');
    buf.put_slice(line.uri.as_bytes());
    buf.put_u8(b' ');
    write_version(buf, line.version);
    buf.put_slice(CRLF);
}

/// 写出状态行，含结尾 `CRLF`；原因短语为空时仍保留状态码后的 `SP`。
pub fn write_status_line<B: BufMut>(buf: &mut B, line: &StatusLine) {
    write_version(buf, line.version);
    buf.put_u8(b' ');
    put_decimal(buf, u32::from(line.code.as_u16()));
    buf.put_u8(b' ');
    buf.put_slice(line.reason.as_bytes());
    buf.put_slice(CRLF);
}

/// 在栈上渲染十进制数字后整体写入，不做堆分配；`u32` 至多 10 位。
fn put_decimal<B: BufMut>(buf: &mut B, mut value: u32) {
    let mut digits = [0u8; 10];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    buf.put_slice(&digits[start..]);
}
