//! # Error 模块
//!
//! 定义编译前端的错误类型。所有错误都是终止性的：遇到第一个错误即停止，
//! 不返回部分 AST。

use thiserror::Error;

use crate::script::token::TokenKind;

/// 词法错误：当前位置没有任何词法规则能够匹配
#[derive(Error, Debug, Clone, PartialEq)]
#[error("第 {line} 行：无法识别的文本 '{text}'")]
pub struct LexError {
    pub line: usize,
    /// 从出错位置到行尾的原始文本
    pub text: String,
}

/// 语法错误：词法单元序列不符合文法的任何合法延续
#[derive(Error, Debug, Clone, PartialEq)]
#[error("第 {line} 行：意外的 '{found}'，期望 {}", join_kinds(.expected))]
pub struct SyntaxError {
    pub line: usize,
    /// 出错的词法单元原文；输入结束时为 `EOF`
    pub found: String,
    /// 此处文法允许的词法单元种类
    pub expected: Vec<TokenKind>,
    /// 始终为 `false`：解析器不做错误恢复
    pub recoverable: bool,
}

/// 嵌套过深：括号、前缀运算、块或字面量的层数超过 [`MAX_NESTING`]
#[derive(Error, Debug, Clone, PartialEq)]
#[error("第 {line} 行：嵌套超过 {limit} 层")]
pub struct NestingError {
    pub line: usize,
    pub limit: usize,
}

/// 解析器允许的最大嵌套层数
pub const MAX_NESTING: usize = 64;

/// 内嵌字面量错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddedLiteralError {
    /// 字面量数组/映射的语法错误
    #[error("第 {line} 行：字面量中意外的 '{found}'，期望 {}", join_kinds(.expected))]
    Unexpected {
        line: usize,
        found: String,
        expected: Vec<TokenKind>,
    },

    /// 标量二次解码失败（严格模式）
    #[error("第 {line} 行：字面量 '{text}' 无法解码为 JSON 值 - {message}")]
    Decode {
        line: usize,
        text: String,
        message: String,
    },
}

impl EmbeddedLiteralError {
    pub fn line(&self) -> usize {
        match self {
            EmbeddedLiteralError::Unexpected { line, .. }
            | EmbeddedLiteralError::Decode { line, .. } => *line,
        }
    }
}

/// 编译前端统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// 词法错误
    #[error("词法错误: {0}")]
    Lex(#[from] LexError),

    /// 语法错误
    #[error("语法错误: {0}")]
    Syntax(#[from] SyntaxError),

    /// 内嵌字面量错误
    #[error("字面量错误: {0}")]
    Literal(#[from] EmbeddedLiteralError),

    /// 嵌套过深
    #[error("语法错误: {0}")]
    Nesting(#[from] NestingError),
}

impl CompileError {
    /// 出错的行号
    pub fn line(&self) -> usize {
        match self {
            CompileError::Lex(e) => e.line,
            CompileError::Syntax(e) => e.line,
            CompileError::Literal(e) => e.line(),
            CompileError::Nesting(e) => e.line,
        }
    }
}

/// Result 类型别名
pub type CompileResult<T> = Result<T, CompileError>;

fn join_kinds(kinds: &[TokenKind]) -> String {
    kinds
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message_lists_expected() {
        let err = SyntaxError {
            line: 3,
            found: "]".to_string(),
            expected: vec![TokenKind::EndStatement, TokenKind::Plus],
            recoverable: false,
        };
        assert_eq!(err.to_string(), "第 3 行：意外的 ']'，期望 ';', '+'");
    }

    #[test]
    fn test_compile_error_line() {
        let err: CompileError = LexError {
            line: 7,
            text: "$".to_string(),
        }
        .into();
        assert_eq!(err.line(), 7);

        let err: CompileError = EmbeddedLiteralError::Decode {
            line: 2,
            text: "abc".to_string(),
            message: "expected value".to_string(),
        }
        .into();
        assert_eq!(err.line(), 2);

        let err: CompileError = NestingError {
            line: 4,
            limit: MAX_NESTING,
        }
        .into();
        assert_eq!(err.line(), 4);
        assert_eq!(err.to_string(), "语法错误: 第 4 行：嵌套超过 64 层");
    }
}
