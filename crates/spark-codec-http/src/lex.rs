//! 词法分析器：把完整的输入缓冲切分为单 token 前瞻的词法序列。
//!
//! ## 模块目的（Why）
//! - 语法产生式只依赖“当前前瞻 token + 推进”两个原语，避免每个产生式各自扫描字节。
//! - 前瞻状态（当前 token 与游标）显式保存在 [`Lexer`] 内，不依赖任何流式 `peek` 原语，
//!   因而解析核心与 I/O 抽象无关。
//!
//! ## 分类规则（What）
//! 按优先级作用于下一个未消费字节：
//! 1. 输入结束 → 空 token（[`LexKind::End`]）；
//! 2. `SP`/`CR`/`LF` → 单字节空白 token；
//! 3. tspecials 分隔符 → 单字节分隔符 token；
//! 4. ASCII 数字 → 最长数字串；
//! 5. ASCII 字母 → 最长字母串；
//! 6. 其它 → 单字节 token。
//!
//! ## 风险提示（Trade-offs）
//! - 仅向前、仅一个 token 的前瞻，不保留回滚缓冲；需要回溯的文法不能在此之上表达。

use crate::error::{GrammarViolation, symbolic};

/// tspecials 分隔符集合（含 `SP` 与 `HT`）。
pub const TSPECIALS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";

/// 判断字节是否为控制字符（0–31 或 127）。
#[inline]
pub fn is_ctl(byte: u8) -> bool {
    byte <= 31 || byte == 127
}

/// 判断字节是否属于 tspecials 分隔符集合。
#[inline]
pub fn is_tspecial(byte: u8) -> bool {
    TSPECIALS.contains(&byte)
}

/// 词法 token 的分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexKind {
    /// 最长 ASCII 字母串。
    Word,
    /// 最长 ASCII 数字串。
    Number,
    /// 单个 `SP`、`CR` 或 `LF`。
    Whitespace,
    /// 单个 tspecials 分隔符（`SP` 除外，它归入空白）。
    Delimiter,
    /// 其余任意单字节。
    Byte,
    /// 输入结束。
    End,
}

/// 已分类的词法单元，文本借用自输入缓冲，生成后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexToken<'a> {
    kind: LexKind,
    text: &'a [u8],
    offset: usize,
}

impl<'a> LexToken<'a> {
    /// token 分类。
    pub fn kind(&self) -> LexKind {
        self.kind
    }

    /// token 的原始字节。
    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    /// token 在输入中的起始偏移。
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 是否为输入结束。
    pub fn is_end(&self) -> bool {
        self.kind == LexKind::End
    }

    /// 是否恰为给定字面量。
    pub fn is(&self, literal: &[u8]) -> bool {
        self.text == literal
    }

    /// 单字节 token 是否为控制字符；多字节 token 永远不是。
    pub fn is_ctl(&self) -> bool {
        matches!(self.text, [byte] if is_ctl(*byte))
    }

    /// 单字节 token 是否为 tspecials 分隔符。
    pub fn is_tspecial(&self) -> bool {
        matches!(self.text, [byte] if is_tspecial(*byte))
    }
}

/// 单 token 前瞻的词法分析器。
///
/// # 教案式说明
/// - **意图（Why）**：为语法产生式提供 `peek`/`advance` 两个原语以及字面量、整数的消费辅助。
/// - **契约（What）**：
///   - 构造时即计算首个前瞻 token；
///   - [`Lexer::advance`] 返回被消费的 token 并计算下一个；
///   - 到达输入结束后，`advance` 持续返回 `End` token，不会越界。
/// - **实现（How）**：`cursor` 指向尚未分类的首字节，`current` 缓存已分类的前瞻 token。
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a [u8],
    cursor: usize,
    current: LexToken<'a>,
}

impl<'a> Lexer<'a> {
    /// 基于完整输入缓冲构造词法分析器。
    pub fn new(input: &'a [u8]) -> Self {
        let mut lexer = Self {
            input,
            cursor: 0,
            current: LexToken {
                kind: LexKind::End,
                text: &[],
                offset: 0,
            },
        };
        lexer.current = lexer.classify();
        lexer
    }

    /// 当前前瞻 token，不消费。
    pub fn peek(&self) -> LexToken<'a> {
        self.current
    }

    /// 消费当前 token 并计算下一个，返回被消费的 token。
    pub fn advance(&mut self) -> LexToken<'a> {
        let consumed = self.current;
        self.current = self.classify();
        consumed
    }

    /// 若前瞻 token 恰为 `literal` 则消费，否则返回以符号名描述期望的违例。
    pub fn expect(&mut self, literal: &'static [u8]) -> Result<LexToken<'a>, GrammarViolation> {
        if self.current.is(literal) {
            Ok(self.advance())
        } else {
            Err(self.violation_literal(literal))
        }
    }

    /// 消费一个数字 token 并转换为 `u32`。
    ///
    /// 分类规则保证数字 token 只含 ASCII 数字；溢出时返回违例而不是截断。
    pub fn expect_number(&mut self) -> Result<(u32, LexToken<'a>), GrammarViolation> {
        let token = self.current;
        if token.kind != LexKind::Number {
            return Err(self.violation("1*DIGIT"));
        }
        let value = decimal(token.text).ok_or_else(|| self.violation("DIGIT within u32"))?;
        self.advance();
        Ok((value, token))
    }

    /// 自 `start` 起、到前瞻 token 之前已被消费的字节。
    ///
    /// token 在输入中连续排列，产生式据此一次性取回其覆盖的原文，而不必逐个拼接。
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.input[start..self.current.offset]
    }

    /// 前瞻 token 是否为单字节且满足谓词。
    pub fn peek_byte_is(&self, predicate: impl Fn(u8) -> bool) -> bool {
        matches!(self.current.text, [byte] if predicate(*byte))
    }

    /// 取出从前瞻 token 起直到输入结束的全部字节，并把词法器推进到结束状态。
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.input[self.current.offset..];
        self.cursor = self.input.len();
        self.current = self.classify();
        rest
    }

    /// 以当前前瞻位置构造产生式违例。
    pub fn violation(&self, production: &'static str) -> GrammarViolation {
        GrammarViolation::new(production, self.current.offset)
    }

    /// 以当前前瞻位置构造字面量违例，空白与控制字符渲染为符号名。
    pub fn violation_literal(&self, literal: &[u8]) -> GrammarViolation {
        GrammarViolation::new(symbolic(literal), self.current.offset)
    }

    fn classify(&mut self) -> LexToken<'a> {
        let start = self.cursor;
        let Some(&byte) = self.input.get(start) else {
            return LexToken {
                kind: LexKind::End,
                text: &[],
                offset: start,
            };
        };

        let (kind, end) = match byte {
            b' ' | b'\r' | b'\n' => (LexKind::Whitespace, start + 1),
            _ if is_tspecial(byte) => (LexKind::Delimiter, start + 1),
            _ if byte.is_ascii_digit() => (
                LexKind::Number,
                self.run_end(start, |b| b.is_ascii_digit()),
            ),
            _ if byte.is_ascii_alphabetic() => (
                LexKind::Word,
                self.run_end(start, |b| b.is_ascii_alphabetic()),
            ),
            _ => (LexKind::Byte, start + 1),
        };

        self.cursor = end;
        LexToken {
            kind,
            text: &self.input[start..end],
            offset: start,
        }
    }

    fn run_end(&self, start: usize, accept: impl Fn(u8) -> bool) -> usize {
        self.input[start..]
            .iter()
            .position(|&b| !accept(b))
            .map_or(self.input.len(), |len| start + len)
    }
}

/// 十进制数字串转 `u32`，溢出返回 `None`。
fn decimal(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &digit| {
        acc.checked_mul(10)?.checked_add(u32::from(digit - b'0'))
    })
}
