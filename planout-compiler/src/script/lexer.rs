//! # Lexer 模块
//!
//! 将脚本文本转换为带行号的词法单元序列。
//!
//! 词法器本身无状态：每次调用 [`tokenize`] 都创建独立的 `logos` 词法器，
//! 多个线程可以同时对不同输入进行词法分析。

use logos::Logos;
use tracing::trace;

use crate::error::LexError;
use crate::script::token::{SpannedToken, Token};

/// 行号索引
///
/// 记录每一行起始的字节偏移，用于把 span 映射为 1 起始行号。
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// 字节偏移所在的行（1 起始）
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

/// 对脚本文本做词法分析
///
/// # 返回
///
/// 按源文本顺序排列的词法单元；遇到无法识别的字符序列时返回 [`LexError`]，
/// 行号为该序列起始所在行。
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let index = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let line = index.line_of(span.start);
        match result {
            Ok(token) => tokens.push(SpannedToken {
                token,
                lexeme: lexer.slice().to_string(),
                line,
                span,
            }),
            Err(()) => {
                return Err(LexError {
                    line,
                    text: unrecognized_text(source, span.start),
                });
            }
        }
    }

    trace!(count = tokens.len(), "词法分析完成");
    Ok(tokens)
}

/// 截取出错位置到行尾的文本，便于定位
fn unrecognized_text(source: &str, start: usize) -> String {
    let rest = &source[start..];
    let end = rest.find('\n').unwrap_or(rest.len());
    rest[..end].to_string()
}
