//! 解析模块入口。
//!
//! ## 模块目标（Why）
//! - 把完整输入缓冲解析为 [`Message`] 树；任一违例立即终止，不返回部分结果、不做恢复。
//!
//! ## 结构概览（What）
//! - `primitive`：Token、QuotedString、Method、Request-URI、HTTP-Version、Status-Code、Reason-Phrase；
//! - `structural`：Request-Line、Status-Line、头部与实体主体；
//! - `message`：四种报文形态的分派。
//!
//! ## 使用方式（How）
//! - 不知道报文方向时调用 [`parse_message`]；
//! - 已知方向（例如作为客户端读取响应）时调用 [`parse_request`] / [`parse_response`]，
//!   它们借助调用方提供的上下文消除分派器无法消除的歧义；
//! - 需要逐个产生式组合时，直接基于 [`Lexer`] 调用导出的产生式函数。

mod message;
mod primitive;
mod structural;

pub use primitive::{
    http_version, method, quoted_string, reason_phrase, request_uri, status_code, token,
};
pub use structural::{crlf, entity_body, header, headers, request_line, status_line};

use tracing::trace;

use crate::{error::GrammarViolation, lex::Lexer, options::ParseOptions, types::Message};

/// 以默认选项解析任意方向的报文。
pub fn parse_message(input: &[u8]) -> Result<Message, GrammarViolation> {
    parse_message_with(input, &ParseOptions::default())
}

/// 以给定选项解析任意方向的报文。
///
/// ### 契约说明（What）
/// - **输入**：代表单个报文的完整缓冲，结束即逻辑输入结束。
/// - **返回**：成功时为完整的 [`Message`] 树；失败时为首个 [`GrammarViolation`]。
/// - **后置条件**：对成功结果序列化得到的字节与 `input` 完全一致。
pub fn parse_message_with(
    input: &[u8],
    options: &ParseOptions,
) -> Result<Message, GrammarViolation> {
    run(input, "message", |lexer| message::message(lexer, options))
}

/// 已知输入是请求时使用：只接受 Full-Request 与 Simple-Request，空输入被拒绝。
pub fn parse_request(input: &[u8]) -> Result<Message, GrammarViolation> {
    run(input, "request", message::request)
}

/// 已知输入是响应时使用：`HTTP` 开头为 Full-Response，否则整段输入即 Simple-Response 主体。
pub fn parse_response(input: &[u8]) -> Result<Message, GrammarViolation> {
    parse_response_with(input, &ParseOptions::default())
}

/// 以给定选项解析响应。
pub fn parse_response_with(
    input: &[u8],
    options: &ParseOptions,
) -> Result<Message, GrammarViolation> {
    run(input, "response", |lexer| message::response(lexer, options))
}

fn run(
    input: &[u8],
    entry: &'static str,
    parse: impl FnOnce(&mut Lexer<'_>) -> Result<Message, GrammarViolation>,
) -> Result<Message, GrammarViolation> {
    let mut lexer = Lexer::new(input);
    match parse(&mut lexer) {
        Ok(message) => {
            trace!(
                entry,
                kind = message.kind().as_str(),
                bytes = input.len(),
                "http message parsed"
            );
            Ok(message)
        }
        Err(violation) => {
            trace!(
                entry,
                expected = violation.expected(),
                offset = violation.offset(),
                "http grammar violation"
            );
            Err(violation)
        }
    }
}
