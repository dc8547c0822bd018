//! 原语产生式：Token、QuotedString、Method、Request-URI、HTTP-Version、Status-Code、Reason-Phrase。
//!
//! 每个函数从 [`Lexer`] 的当前前瞻位置开始消费，成功时前瞻停在产生式之后的首个 token；
//! 失败时返回 [`GrammarViolation`]，词法器状态不再有意义，调用方应放弃整个解析。

use bytes::Bytes;

use crate::{
    error::GrammarViolation,
    lex::{LexKind, Lexer},
    options::StatusCodePolicy,
    types::{
        HttpVersion, Method, QuotedString, ReasonPhrase, RequestUri, StatusCode, Token,
        is_uri_break,
    },
};

/// `token := 1*<any CHAR except CTLs or tspecials>`。
///
/// 贪婪拼接后续词法 token，直到遇到控制字符、分隔符或输入结束；一个字符都没有消费时报告违例。
pub fn token(lexer: &mut Lexer<'_>) -> Result<Token, GrammarViolation> {
    let start = lexer.peek().offset();
    loop {
        let next = lexer.peek();
        if next.is_end() || next.is_ctl() || next.is_tspecial() {
            break;
        }
        lexer.advance();
    }

    let text = lexer.consumed_since(start);
    if text.is_empty() {
        return Err(lexer.violation("token"));
    }
    Ok(Token::from_parsed(Bytes::copy_from_slice(text)))
}

/// `quoted-string := <"> *(qdtext) <">`，存储值保留两侧引号。
///
/// qdtext 为除引号与控制字符外的任意字符，或线性空白（可选 `CRLF` 加一个以上 `SP`/`HT`）。
pub fn quoted_string(lexer: &mut Lexer<'_>) -> Result<QuotedString, GrammarViolation> {
    let start = lexer.peek().offset();
    lexer.expect(b"\"")?;

    loop {
        let next = lexer.peek();
        if next.is(b"\"") {
            break;
        }
        if next.is_end() {
            return Err(lexer.violation_literal(b"\""));
        }
        if next.is(b"\r") || next.is(b"\t") {
            linear_white_space(lexer)?;
            continue;
        }
        if next.is_ctl() {
            return Err(lexer.violation("qdtext"));
        }
        lexer.advance();
    }

    lexer.expect(b"\"")?;
    Ok(QuotedString::from_parsed(Bytes::copy_from_slice(
        lexer.consumed_since(start),
    )))
}

/// `LWS := [CRLF] 1*( SP | HT )`。
fn linear_white_space(lexer: &mut Lexer<'_>) -> Result<(), GrammarViolation> {
    if lexer.peek().is(b"\r") {
        lexer.advance();
        lexer.expect(b"\n")?;
    }
    if !is_sp_or_ht(lexer) {
        return Err(lexer.violation("LWS"));
    }
    while is_sp_or_ht(lexer) {
        lexer.advance();
    }
    Ok(())
}

fn is_sp_or_ht(lexer: &Lexer<'_>) -> bool {
    lexer.peek_byte_is(|byte| byte == b' ' || byte == b'\t')
}

/// `Method := token | quoted-string`，前瞻为引号时走 quoted-string 分支。
pub fn method(lexer: &mut Lexer<'_>) -> Result<Method, GrammarViolation> {
    if lexer.peek().is(b"\"") {
        quoted_string(lexer).map(Method::Quoted)
    } else {
        token(lexer).map(Method::Token)
    }
}

/// Request-URI：一个或多个不含空白（`SP`/`HT`/`CR`/`LF`）的字节，不做 URI 语法校验。
pub fn request_uri(lexer: &mut Lexer<'_>) -> Result<RequestUri, GrammarViolation> {
    let start = lexer.peek().offset();
    while !lexer.peek().is_end() && !lexer.peek_byte_is(is_uri_break) {
        lexer.advance();
    }

    let text = lexer.consumed_since(start);
    if text.is_empty() {
        return Err(lexer.violation("Request-URI"));
    }
    Ok(RequestUri::from_parsed(Bytes::copy_from_slice(text)))
}

/// `HTTP-Version := "HTTP" "/" 1*DIGIT "." 1*DIGIT`。
pub fn http_version(lexer: &mut Lexer<'_>) -> Result<HttpVersion, GrammarViolation> {
    lexer.expect(b"HTTP")?;
    lexer.expect(b"/")?;
    let major = version_component(lexer)?;
    lexer.expect(b".")?;
    let minor = version_component(lexer)?;
    Ok(HttpVersion { major, minor })
}

/// 版本号分量以整数保存，带前导零的多位数字无法原样还原，因此拒绝。
fn version_component(lexer: &mut Lexer<'_>) -> Result<u32, GrammarViolation> {
    let (value, token) = lexer.expect_number()?;
    if let [b'0', _, ..] = token.text() {
        return Err(GrammarViolation::new(
            "DIGIT without leading zero",
            token.offset(),
        ));
    }
    Ok(value)
}

/// `Status-Code := 3DIGIT`，且数值须被 `policy` 接受。
///
/// 位数在转换为整数之前基于原始 token 文本检查：整数本身无法区分 `42` 与 `042`。
pub fn status_code(
    lexer: &mut Lexer<'_>,
    policy: StatusCodePolicy,
) -> Result<StatusCode, GrammarViolation> {
    let next = lexer.peek();
    if next.kind() != LexKind::Number {
        return Err(lexer.violation("Status-Code"));
    }
    let width = next.text().len();
    if width != 3 {
        return Err(lexer.violation("3DIGIT Status-Code"));
    }

    let (value, token) = lexer.expect_number()?;
    match u16::try_from(value) {
        Ok(code) if policy.accepts(code) => Ok(StatusCode::from_parsed(code)),
        _ => Err(GrammarViolation::new("known Status-Code", token.offset())),
    }
}

/// `Reason-Phrase := *<TEXT, excluding CR, LF>`，可以为空。
pub fn reason_phrase(lexer: &mut Lexer<'_>) -> ReasonPhrase {
    let start = lexer.peek().offset();
    while !lexer.peek().is_end() && !lexer.peek_byte_is(|byte| byte == b'\r' || byte == b'\n') {
        lexer.advance();
    }
    ReasonPhrase::from_parsed(Bytes::copy_from_slice(lexer.consumed_since(start)))
}
