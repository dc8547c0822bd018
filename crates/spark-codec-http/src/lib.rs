#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! # spark-codec-http
//!
//! ## 教案目的（Why）
//! - **定位**：该 crate 是 HTTP/0.9 与 HTTP/1.0 报文的语法驱动解析器与序列化器，覆盖旧式“简单”形态与带版本的“完整”形态。
//! - **用途**：给定完整的字节缓冲，判定其属于哪种报文形态、构建结构化表示，并能从表示逐字节还原原文；
//!   主要用作报文生成器或模糊测试器的往返判定器。
//!
//! ## 交互契约（What）
//! - **输入前提**：调用方提供代表单个报文的完整内存缓冲，缓冲结束即逻辑输入结束；不支持增量解析。
//! - **输出能力**：
//!   - [`parse_message`] 在 Simple-Request、Full-Request、Full-Response、Simple-Response 四者中择一；
//!   - [`write_message`] / [`Message::to_bytes`] 为解析的精确逆运算；
//!   - [`verify_roundtrip`] 组合两者并逐字节比对。
//! - **错误面**：唯一的语法错误 [`GrammarViolation`]，描述期望的字面量或产生式；空白与控制字符以 `<SP>`、`<CR>`、`<LF>` 等符号名呈现。
//!
//! ## 实现策略（How）
//! - **模块划分**：
//!   1. `lex`：单 token 前瞻的词法分析器；
//!   2. `parse`：原语、结构产生式与报文形态分派；
//!   3. `fmt`：序列化；
//!   4. `oracle`：往返校验；
//!   5. `options`：状态码目录策略；
//!   6. `types` / `error`：数据模型与错误。
//! - **关键技巧**：报文形态与方法的两种写法都是封闭集合，用枚举加穷尽匹配表达。
//!
//! ## 风险提示（Trade-offs）
//! - 以请求形状文本开头的 Simple-Response 与请求在局部前瞻下不可区分，分派器保留该局限；
//!   持有方向上下文的调用方应使用 [`parse_request`] / [`parse_response`]。
//! - 不处理头部折行、大小写语义、分块传输或按长度截断主体。

#[cfg(not(feature = "alloc"))]
compile_error!(
    "spark-codec-http 依赖堆分配能力：请启用默认特性或通过 `--features alloc` 显式打开该功能。",
);

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod fmt;
pub mod lex;
pub mod options;
pub mod oracle;
pub mod parse;
pub mod types;

pub use crate::error::{GrammarViolation, RoundTripError};
pub use crate::fmt::{to_bytes, write_message};
pub use crate::options::{ParseOptions, STATUS_CODE_CATALOG, StatusCodePolicy};
pub use crate::oracle::{check_regenerated, verify_roundtrip, verify_roundtrip_with};
pub use crate::parse::{
    parse_message, parse_message_with, parse_request, parse_response, parse_response_with,
};
pub use crate::types::{
    EntityBody, FullRequest, FullResponse, Header, Headers, HttpVersion, Message, MessageKind,
    Method, QuotedString, ReasonPhrase, RequestLine, RequestUri, SimpleRequest, SimpleResponse,
    StatusCode, StatusLine, Token,
};

#[cfg(test)]
mod tests {
    #[test]
    fn std_feature_pulls_in_alloc() {
        assert!(cfg!(feature = "std"));
        assert!(cfg!(feature = "alloc"));
    }
}
