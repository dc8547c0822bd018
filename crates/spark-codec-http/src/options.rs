//! 解析策略配置。
//!
//! ## 模块目的（Why）
//! - 状态码默认采用封闭目录：语法上合法、但不在目录中的三位码会被拒绝。
//!   需要宽松行为的调用方通过 [`StatusCodePolicy::AnyThreeDigit`] 显式切换，而不是假设目录穷尽所有合法码。
//!
//! ## 使用契约（What）
//! - [`ParseOptions::default`] 等价于严格目录；
//! - 启用 `serde` 特性后可从配置文件反序列化，字段名采用 kebab-case。

/// 默认接受的状态码目录。
pub const STATUS_CODE_CATALOG: [u16; 32] = [
    100, 101, 200, 201, 203, 204, 205, 206, 300, 301, 302, 303, 304, 305, 400, 401, 402, 403, 404,
    405, 406, 407, 408, 409, 410, 411, 412, 500, 501, 502, 503, 504,
];

/// 状态码接受策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum StatusCodePolicy {
    /// 仅接受 [`STATUS_CODE_CATALOG`] 中的状态码。
    #[default]
    Catalog,
    /// 接受首位为 1–9 的任意三位码。
    ///
    /// 首位不能为 0：`u16` 无法记住前导零，否则重新序列化时会丢失字节。
    AnyThreeDigit,
}

impl StatusCodePolicy {
    /// 判断数值是否被策略接受；位数检查由解析器在转换前完成。
    pub fn accepts(self, code: u16) -> bool {
        match self {
            Self::Catalog => STATUS_CODE_CATALOG.contains(&code),
            Self::AnyThreeDigit => (100..=999).contains(&code),
        }
    }
}

/// 解析选项。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct ParseOptions {
    /// 状态码接受策略。
    pub status_codes: StatusCodePolicy,
}

impl ParseOptions {
    /// 以给定状态码策略构造。
    pub const fn with_status_codes(status_codes: StatusCodePolicy) -> Self {
        Self { status_codes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_closed() {
        let policy = StatusCodePolicy::Catalog;
        assert!(policy.accepts(200));
        assert!(policy.accepts(504));
        assert!(!policy.accepts(202));
        assert!(!policy.accepts(999));
    }

    #[test]
    fn permissive_policy_requires_three_significant_digits() {
        let policy = StatusCodePolicy::AnyThreeDigit;
        assert!(policy.accepts(999));
        assert!(policy.accepts(100));
        assert!(!policy.accepts(42));
        assert!(!policy.accepts(1000));
    }
}
