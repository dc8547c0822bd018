//! 报文形态分派。
//!
//! ## 模块目的（Why）
//! - 在四种顶层形态（Simple-Request、Full-Request、Full-Response、Simple-Response）之间做出选择，
//!   只依赖单 token 前瞻，不做回溯。
//!
//! ## 分派算法（How）
//! 1. 前瞻为 `HTTP` → Status-Line、头部、主体 → Full-Response；
//! 2. 否则若输入非空 → 无条件消费两种请求共有的前缀 `Method SP Request-URI`，再看下一个 token：
//!    - `SP` → 提交到 Full-Request：HTTP-Version、`CRLF`、头部、主体；
//!    - 其它 → 必须立即是 `CRLF`，方法必须是裸 token `GET`，且之后输入必须结束 → Simple-Request；
//! 3. 否则（空输入）→ 空主体的 Simple-Response。
//!
//! ## 已知局限（Trade-offs）
//! - 以请求形状文本开头的 Simple-Response 与真正的请求在局部前瞻下不可区分。
//!   正确区分需要外部上下文（例如对端使用的是简单还是完整协议形态），分派器不做推断；
//!   掌握该上下文的调用方应改用 [`parse_request`](super::parse_request) 或 [`parse_response`](super::parse_response)。

use tracing::debug;

use crate::{
    error::GrammarViolation,
    lex::Lexer,
    options::ParseOptions,
    types::{FullRequest, FullResponse, Message, RequestLine, SimpleRequest, SimpleResponse},
};

use super::{
    primitive::{http_version, method, request_uri},
    structural::{crlf, entity_body, headers, status_line},
};

/// 顶层分派：`message := Simple-Request | Simple-Response | Full-Request | Full-Response`。
pub(crate) fn message(
    lexer: &mut Lexer<'_>,
    options: &ParseOptions,
) -> Result<Message, GrammarViolation> {
    if lexer.peek().is(b"HTTP") {
        debug!(branch = "full-response", "dispatch on HTTP lookahead");
        return full_response(lexer, options).map(Message::FullResponse);
    }
    if lexer.peek().is_end() {
        debug!(branch = "simple-response", "dispatch on empty input");
        return Ok(Message::SimpleResponse(SimpleResponse::default()));
    }
    request(lexer)
}

/// 请求分派：先消费共有前缀，再以 URI 之后的 token 决定形态。
pub(crate) fn request(lexer: &mut Lexer<'_>) -> Result<Message, GrammarViolation> {
    let method_offset = lexer.peek().offset();
    let method = method(lexer)?;
    lexer.expect(b" ")?;
    let uri = request_uri(lexer)?;

    if lexer.peek().is(b" ") {
        debug!(branch = "full-request", offset = lexer.peek().offset(), "SP after Request-URI");
        lexer.advance();
        let version = http_version(lexer)?;
        crlf(lexer)?;
        let headers = headers(lexer)?;
        let body = entity_body(lexer);
        return Ok(Message::FullRequest(FullRequest {
            request_line: RequestLine {
                method,
                uri,
                version,
            },
            headers,
            body,
        }));
    }

    debug!(branch = "simple-request", offset = lexer.peek().offset(), "CRLF after Request-URI");
    crlf(lexer)?;
    if !method.is_get() {
        return Err(GrammarViolation::new("GET", method_offset));
    }
    // Simple-Request 没有主体，尾随字节无处安放。
    if !lexer.peek().is_end() {
        return Err(lexer.violation_literal(b""));
    }
    Ok(Message::SimpleRequest(SimpleRequest { uri }))
}

/// 响应分派：`HTTP` 开头为 Full-Response，其余全部输入（可为空）作为 Simple-Response 主体。
pub(crate) fn response(
    lexer: &mut Lexer<'_>,
    options: &ParseOptions,
) -> Result<Message, GrammarViolation> {
    if lexer.peek().is(b"HTTP") {
        debug!(branch = "full-response", "response on HTTP lookahead");
        return full_response(lexer, options).map(Message::FullResponse);
    }
    debug!(branch = "simple-response", "response without status line");
    Ok(Message::SimpleResponse(SimpleResponse {
        body: entity_body(lexer),
    }))
}

fn full_response(
    lexer: &mut Lexer<'_>,
    options: &ParseOptions,
) -> Result<FullResponse, GrammarViolation> {
    let status_line = status_line(lexer, options.status_codes)?;
    let headers = headers(lexer)?;
    let body = entity_body(lexer);
    Ok(FullResponse {
        status_line,
        headers,
        body,
    })
}
