//! 基础类型定义模块。
//!
//! ## 模块目标（Why）
//! - 为解析与序列化提供统一的数据模型：报文是一棵树，每个节点独占其子节点与字节数据，无共享、无环。
//! - 构造完成后不可变；需要程序化构造报文时，经过校验的构造函数保证序列化结果能被重新解析为同一棵树，
//!   但有两处需要方向上下文：
//!   - 非空的 [`SimpleResponse`] 只能经 [`parse_response`](crate::parse_response) 还原，分派器会把它当作请求；
//!   - [`StatusCode`] 以宽松策略构造时，重新解析也须使用同一策略。
//! - 直接写出 [`Method::Token`] 等公开变体会绕过校验，此时不作上述保证。
//!
//! ## 结构概览（What）
//! - 原语：[`Token`]、[`QuotedString`]、[`Method`]、[`HttpVersion`]、[`StatusCode`]、[`ReasonPhrase`]；
//! - 结构：[`RequestLine`]、[`StatusLine`]、[`Header`]/[`Headers`]、[`EntityBody`]；
//! - 顶层：[`Message`] 四选一标签联合，以及 [`MessageKind`] 判别值。
//!
//! ## 实现策略（How）
//! - 字节类字段使用 [`bytes::Bytes`]：输入允许任意非 UTF-8 字节，而往返定律要求逐字节保留；
//! - 有序头部使用 `Vec`，顺序即语义，不做任何合并或去重。

use alloc::vec::{self, Vec};
use core::{fmt, slice};

use bytes::Bytes;

use crate::lex::{Lexer, is_ctl, is_tspecial};
use crate::options::StatusCodePolicy;

macro_rules! bytes_newtype_eq {
    ($name:ident) => {
        impl PartialEq<[u8]> for $name {
            fn eq(&self, other: &[u8]) -> bool {
                self.as_bytes() == other
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.as_bytes() == other.as_bytes()
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_bytes() == other.as_bytes()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_lossy(f, self.as_bytes())
            }
        }
    };
}

/// `token := 1*<any CHAR except CTLs or tspecials>`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(Bytes);

impl Token {
    /// 校验并构造 token；空串或含控制字符、分隔符时返回 `None`。
    pub fn new(text: impl Into<Bytes>) -> Option<Self> {
        let text = text.into();
        let valid = !text.is_empty() && text.iter().all(|&b| !is_ctl(b) && !is_tspecial(b));
        valid.then_some(Self(text))
    }

    pub(crate) fn from_parsed(text: Bytes) -> Self {
        Self(text)
    }

    /// 原始字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// ASCII 大小写不敏感比较。
    pub fn eq_ignore_ascii_case(&self, other: &[u8]) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

bytes_newtype_eq!(Token);

/// 带引号的字符串，存储值包含首尾引号本身以便逐字节还原。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotedString(Bytes);

impl QuotedString {
    /// 校验并构造；`text` 必须是完整的 `"..."` 文本且恰好构成一个 quoted-string。
    pub fn new(text: impl Into<Bytes>) -> Option<Self> {
        let text = text.into();
        let mut lexer = Lexer::new(&text);
        let parsed = crate::parse::quoted_string(&mut lexer).ok()?;
        lexer.peek().is_end().then_some(parsed)
    }

    pub(crate) fn from_parsed(text: Bytes) -> Self {
        Self(text)
    }

    /// 含引号的原始字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 去掉首尾引号后的内容。
    pub fn content(&self) -> &[u8] {
        &self.0[1..self.0.len() - 1]
    }
}

bytes_newtype_eq!(QuotedString);

/// 请求方法：裸 token 或带引号的扩展方法。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `token` 形式，例如 `GET`。
    ///
    /// 直接构造该变体不检查 `HTTP` 前缀，优先使用 [`Method::token`]。
    Token(Token),
    /// `quoted-string` 形式，例如 `"FOO"`，引号保留在值内。
    Quoted(QuotedString),
}

impl Method {
    /// 以裸 token 构造方法。
    ///
    /// 前导字母串恰为 `HTTP` 的 token（如 `HTTP-X`）返回 `None`：分派器会把它读作状态行。
    pub fn token(text: impl Into<Bytes>) -> Option<Self> {
        let token = Token::new(text)?;
        (!opens_status_line(token.as_bytes())).then_some(Self::Token(token))
    }

    /// 方法的文本值，与匹配到的分支无关。
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Token(token) => token.as_bytes(),
            Self::Quoted(quoted) => quoted.as_bytes(),
        }
    }

    /// 是否为裸 token `GET`，Simple-Request 只接受这一种方法。
    pub fn is_get(&self) -> bool {
        matches!(self, Self::Token(token) if token.as_bytes() == b"GET")
    }
}

bytes_newtype_eq!(Method);

/// `HTTP-Version := "HTTP" "/" 1*DIGIT "." 1*DIGIT`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HttpVersion {
    /// 主版本号。
    pub major: u32,
    /// 次版本号。
    pub minor: u32,
}

impl HttpVersion {
    /// `HTTP/1.0`。
    pub const HTTP_10: Self = Self::new(1, 0);

    /// 构造版本号。
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// 三位状态码。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 按给定策略校验并构造状态码。
    pub fn new(code: u16, policy: StatusCodePolicy) -> Option<Self> {
        policy.accepts(code).then_some(Self(code))
    }

    pub(crate) fn from_parsed(code: u16) -> Self {
        Self(code)
    }

    /// 数值。
    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `Reason-Phrase := *<TEXT, excluding CR, LF>`，允许为空。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ReasonPhrase(Bytes);

impl ReasonPhrase {
    /// 校验并构造；含 `CR` 或 `LF` 时返回 `None`。
    pub fn new(text: impl Into<Bytes>) -> Option<Self> {
        let text = text.into();
        (!text.iter().any(|&b| b == b'\r' || b == b'\n')).then_some(Self(text))
    }

    pub(crate) fn from_parsed(text: Bytes) -> Self {
        Self(text)
    }

    /// 原始字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

bytes_newtype_eq!(ReasonPhrase);

/// 请求目标，未做 URI 语法校验：一个或多个非空白字节。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestUri(Bytes);

impl RequestUri {
    /// 校验并构造；空串或含 `SP`/`HT`/`CR`/`LF` 时返回 `None`。
    pub fn new(text: impl Into<Bytes>) -> Option<Self> {
        let text = text.into();
        let valid = !text.is_empty() && !text.iter().any(|&b| is_uri_break(b));
        valid.then_some(Self(text))
    }

    pub(crate) fn from_parsed(text: Bytes) -> Self {
        Self(text)
    }

    /// 原始字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

bytes_newtype_eq!(RequestUri);

/// 前导 ASCII 字母串是否恰为 `HTTP`，与词法器的单词切分一致。
pub(crate) fn opens_status_line(text: &[u8]) -> bool {
    let word = text.iter().take_while(|b| b.is_ascii_alphabetic()).count();
    &text[..word] == b"HTTP"
}

pub(crate) fn is_uri_break(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

/// 单个头部：`field-name ":" [ field-value ] CRLF`。
///
/// `value` 保存冒号之后直到 `CR` 的全部原文，包括前导空白。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    name: Token,
    value: Bytes,
}

impl Header {
    /// 构造头部；值中含 `CR` 时返回 `None`。
    pub fn new(name: Token, value: impl Into<Bytes>) -> Option<Self> {
        let value = value.into();
        (!value.contains(&b'\r')).then_some(Self { name, value })
    }

    pub(crate) fn from_parsed(name: Token, value: Bytes) -> Self {
        Self { name, value }
    }

    /// 字段名。
    pub fn name(&self) -> &Token {
        &self.name
    }

    /// 字段值原文。
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// 有序头部序列，顺序与输入一致。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Headers(Vec<Header>);

impl Headers {
    /// 空头部序列。
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 追加到末尾。
    pub fn push(&mut self, header: Header) {
        self.0.push(header);
    }

    /// 首个名称匹配（ASCII 大小写不敏感）的头部值。
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.0
            .iter()
            .find(|header| header.name.eq_ignore_ascii_case(name.as_bytes()))
            .map(Header::value)
    }

    /// 按原始顺序迭代。
    pub fn iter(&self) -> slice::Iter<'_, Header> {
        self.0.iter()
    }

    /// 头部数量。
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空。
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Headers {
    type Item = Header;
    type IntoIter = vec::IntoIter<Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// 实体主体：消费剩余全部输入的原始字节。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EntityBody(Bytes);

impl EntityBody {
    /// 任意字节都是合法主体。
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// 原始字节。
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 长度。
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否为空。
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

bytes_newtype_eq!(EntityBody);

/// `Request-Line := Method SP Request-URI SP HTTP-Version CRLF`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestLine {
    /// 请求方法。
    pub method: Method,
    /// 请求目标。
    pub uri: RequestUri,
    /// 协议版本。
    pub version: HttpVersion,
}

/// `Status-Line := HTTP-Version SP Status-Code SP Reason-Phrase CRLF`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusLine {
    /// 协议版本。
    pub version: HttpVersion,
    /// 状态码。
    pub code: StatusCode,
    /// 原因短语。
    pub reason: ReasonPhrase,
}

/// `Simple-Request := "GET" SP Request-URI CRLF`。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleRequest {
    /// 请求目标。
    pub uri: RequestUri,
}

/// 带请求行、头部与主体的完整请求。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullRequest {
    /// 请求行。
    pub request_line: RequestLine,
    /// 有序头部。
    pub headers: Headers,
    /// 主体。
    pub body: EntityBody,
}

/// 带状态行、头部与主体的完整响应。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullResponse {
    /// 状态行。
    pub status_line: StatusLine,
    /// 有序头部。
    pub headers: Headers,
    /// 主体。
    pub body: EntityBody,
}

/// `Simple-Response := [ Entity-Body ]`。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SimpleResponse {
    /// 主体，可能为空。
    pub body: EntityBody,
}

/// 顶层报文：四种形态恰居其一。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Message {
    /// 旧式单行请求。
    SimpleRequest(SimpleRequest),
    /// 带版本的完整请求。
    FullRequest(FullRequest),
    /// 带版本的完整响应。
    FullResponse(FullResponse),
    /// 旧式纯主体响应。
    SimpleResponse(SimpleResponse),
}

/// [`Message`] 的判别值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// 见 [`Message::SimpleRequest`]。
    SimpleRequest,
    /// 见 [`Message::FullRequest`]。
    FullRequest,
    /// 见 [`Message::FullResponse`]。
    FullResponse,
    /// 见 [`Message::SimpleResponse`]。
    SimpleResponse,
}

impl MessageKind {
    /// 稳定的短名称，用于日志字段。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SimpleRequest => "simple-request",
            Self::FullRequest => "full-request",
            Self::FullResponse => "full-response",
            Self::SimpleResponse => "simple-response",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Message {
    /// 报文形态。
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::SimpleRequest(_) => MessageKind::SimpleRequest,
            Self::FullRequest(_) => MessageKind::FullRequest,
            Self::FullResponse(_) => MessageKind::FullResponse,
            Self::SimpleResponse(_) => MessageKind::SimpleResponse,
        }
    }

    /// 完整形态的头部；简单形态没有头部。
    pub fn headers(&self) -> Option<&Headers> {
        match self {
            Self::FullRequest(request) => Some(&request.headers),
            Self::FullResponse(response) => Some(&response.headers),
            Self::SimpleRequest(_) | Self::SimpleResponse(_) => None,
        }
    }

    /// 报文主体；Simple-Request 没有主体。
    pub fn body(&self) -> Option<&EntityBody> {
        match self {
            Self::FullRequest(request) => Some(&request.body),
            Self::FullResponse(response) => Some(&response.body),
            Self::SimpleResponse(response) => Some(&response.body),
            Self::SimpleRequest(_) => None,
        }
    }

    /// 序列化为字节，与被解析的原文逐字节一致。
    ///
    /// 手工构造的非空 [`SimpleResponse`] 序列化后只能经 [`parse_response`](crate::parse_response) 还原。
    pub fn to_bytes(&self) -> Bytes {
        crate::fmt::to_bytes(self)
    }
}

fn write_lossy(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for chunk in bytes.utf8_chunks() {
        f.write_str(chunk.valid())?;
        for byte in chunk.invalid() {
            write!(f, "\\x{byte:02x}")?;
        }
    }
    Ok(())
}
