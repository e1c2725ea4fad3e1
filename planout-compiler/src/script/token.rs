//! # Token 模块
//!
//! 脚本语言的词法单元定义。
//!
//! 词法规则由 `logos` 派生生成，遵循最长匹配：
//! 关键字与 `true`/`false`/`null` 以 `#[token]` 声明，优先级高于通用标识符正则；
//! 双字符运算符（`<-`、`||`、`==` 等）天然优先于其单字符前缀。

use std::fmt;
use std::ops::Range;

use logos::{Lexer, Logos};
use serde_json::Number;

/// 词法单元
///
/// 数字与字符串常量在词法阶段即完成解码，不以原始文本形式进入语法分析。
///
/// 空白与 `# ...` 行注释（直到行尾或输入结束）在词法阶段丢弃
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"(\s|#[^\n]*)+")]
pub enum Token {
    #[token("switch")]
    Switch,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("return")]
    Return,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    /// `@`：内嵌字面量起始标记
    #[token("@")]
    LiteralMarker,

    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// 数字常量，符号属于常量本身（`-1`、`+2`）
    #[regex(r"[-+]?([0-9]+(\.[0-9]+)?|\.[0-9]+)([eE][-+]?[0-9]+)?", decode_number)]
    Number(Number),

    /// 字符串常量：双引号支持转义，单引号原样保留
    #[regex(r#""([^"\\]|\\.)*""#, decode_double_quoted)]
    #[regex(r"'[^']*'", decode_single_quoted)]
    Str(String),

    #[token("<-")]
    ArrowAssign,
    #[token("||")]
    OrOr,
    #[token("&&")]
    AndAnd,
    #[token("??")]
    Coalesce,
    #[token("==")]
    EqEq,
    #[token(">=")]
    Gte,
    #[token("<=")]
    Lte,
    #[token("!=")]
    NotEq,
    #[token("=>")]
    Then,

    #[token("=")]
    Assign,
    #[token(":")]
    Colon,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("+")]
    Plus,
    #[token("%")]
    Percent,
    #[token("*")]
    Star,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token("!")]
    Bang,

    /// 语句结束符 `;`
    #[token(";")]
    EndStatement,
}

impl Token {
    /// 对应的无数据种类，用于错误报告中的期望集合
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Switch => TokenKind::Switch,
            Token::If => TokenKind::If,
            Token::Else => TokenKind::Else,
            Token::Return => TokenKind::Return,
            Token::True => TokenKind::True,
            Token::False => TokenKind::False,
            Token::Null => TokenKind::Null,
            Token::LiteralMarker => TokenKind::LiteralMarker,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Number(_) | Token::Str(_) => TokenKind::Constant,
            Token::ArrowAssign => TokenKind::ArrowAssign,
            Token::OrOr => TokenKind::OrOr,
            Token::AndAnd => TokenKind::AndAnd,
            Token::Coalesce => TokenKind::Coalesce,
            Token::EqEq => TokenKind::EqEq,
            Token::Gte => TokenKind::Gte,
            Token::Lte => TokenKind::Lte,
            Token::NotEq => TokenKind::NotEq,
            Token::Then => TokenKind::Then,
            Token::Assign => TokenKind::Assign,
            Token::Colon => TokenKind::Colon,
            Token::LBracket => TokenKind::LBracket,
            Token::RBracket => TokenKind::RBracket,
            Token::LParen => TokenKind::LParen,
            Token::RParen => TokenKind::RParen,
            Token::Comma => TokenKind::Comma,
            Token::LBrace => TokenKind::LBrace,
            Token::RBrace => TokenKind::RBrace,
            Token::Plus => TokenKind::Plus,
            Token::Percent => TokenKind::Percent,
            Token::Star => TokenKind::Star,
            Token::Minus => TokenKind::Minus,
            Token::Slash => TokenKind::Slash,
            Token::Gt => TokenKind::Gt,
            Token::Lt => TokenKind::Lt,
            Token::Bang => TokenKind::Bang,
            Token::EndStatement => TokenKind::EndStatement,
        }
    }
}

/// 词法单元种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Switch,
    If,
    Else,
    Return,
    True,
    False,
    Null,
    LiteralMarker,
    Identifier,
    /// 数字或字符串常量
    Constant,
    ArrowAssign,
    OrOr,
    AndAnd,
    Coalesce,
    EqEq,
    Gte,
    Lte,
    NotEq,
    Then,
    Assign,
    Colon,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    LBrace,
    RBrace,
    Plus,
    Percent,
    Star,
    Minus,
    Slash,
    Gt,
    Lt,
    Bang,
    EndStatement,
    /// 输入结束
    Eof,
}

impl TokenKind {
    /// 错误信息中使用的名称
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Switch => "SWITCH",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::LiteralMarker => "'@'",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Constant => "CONST",
            TokenKind::ArrowAssign => "'<-'",
            TokenKind::OrOr => "'||'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::Coalesce => "'??'",
            TokenKind::EqEq => "'=='",
            TokenKind::Gte => "'>='",
            TokenKind::Lte => "'<='",
            TokenKind::NotEq => "'!='",
            TokenKind::Then => "'=>'",
            TokenKind::Assign => "'='",
            TokenKind::Colon => "':'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Plus => "'+'",
            TokenKind::Percent => "'%'",
            TokenKind::Star => "'*'",
            TokenKind::Minus => "'-'",
            TokenKind::Slash => "'/'",
            TokenKind::Gt => "'>'",
            TokenKind::Lt => "'<'",
            TokenKind::Bang => "'!'",
            TokenKind::EndStatement => "';'",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 带位置信息的词法单元
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    /// 原始文本（字符串常量包含引号）
    pub lexeme: String,
    /// 1 起始行号
    pub line: usize,
    /// 源文本中的字节范围
    pub span: Range<usize>,
}

impl SpannedToken {
    pub fn kind(&self) -> TokenKind {
        self.token.kind()
    }
}

/// 解码数字常量
///
/// 有限整数值（绝对值不超过 2^53）解码为整数，`1.5e3` 得到 `1500`；
/// 其余为浮点数。溢出为无穷时返回 `None`，由词法器报告错误。
fn decode_number(lex: &mut Lexer<Token>) -> Option<Number> {
    let value: f64 = lex.slice().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

fn decode_single_quoted(lex: &mut Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    Some(slice[1..slice.len() - 1].to_string())
}

fn decode_double_quoted(lex: &mut Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    Some(unescape(&slice[1..slice.len() - 1]))
}

/// 解析反斜杠转义；未知转义保留被转义的字符本身
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    _ => out.push('u'),
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(input: &str) -> Vec<Token> {
        Token::lexer(input).map(|t| t.unwrap()).collect()
    }

    #[test]
    fn test_keywords_beat_identifiers() {
        assert_eq!(
            lex_all("if iffy switch return returns"),
            vec![
                Token::If,
                Token::Identifier("iffy".to_string()),
                Token::Switch,
                Token::Return,
                Token::Identifier("returns".to_string()),
            ]
        );
    }

    #[test]
    fn test_two_char_operators_first() {
        assert_eq!(
            lex_all("<- <= < => == = != ! ?? || &&"),
            vec![
                Token::ArrowAssign,
                Token::Lte,
                Token::Lt,
                Token::Then,
                Token::EqEq,
                Token::Assign,
                Token::NotEq,
                Token::Bang,
                Token::Coalesce,
                Token::OrOr,
                Token::AndAnd,
            ]
        );
    }

    #[test]
    fn test_number_decoding() {
        assert_eq!(lex_all("5"), vec![Token::Number(Number::from(5))]);
        assert_eq!(lex_all("-3"), vec![Token::Number(Number::from(-3))]);
        assert_eq!(lex_all("1.5e3"), vec![Token::Number(Number::from(1500))]);
        assert_eq!(
            lex_all(".5"),
            vec![Token::Number(Number::from_f64(0.5).unwrap())]
        );
    }

    #[test]
    fn test_sign_belongs_to_number() {
        // `a-1` 是标识符后跟负数常量，而不是减法
        assert_eq!(
            lex_all("a-1"),
            vec![
                Token::Identifier("a".to_string()),
                Token::Number(Number::from(-1)),
            ]
        );
        assert_eq!(
            lex_all("a - 1"),
            vec![
                Token::Identifier("a".to_string()),
                Token::Minus,
                Token::Number(Number::from(1)),
            ]
        );
    }

    #[test]
    fn test_string_decoding() {
        assert_eq!(
            lex_all(r#""a\"b""#),
            vec![Token::Str("a\"b".to_string())]
        );
        assert_eq!(lex_all(r"'a\nb'"), vec![Token::Str(r"a\nb".to_string())]);
        assert_eq!(lex_all(r#""A\q""#), vec![Token::Str("Aq".to_string())]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            lex_all("# heading\nx # trailing"),
            vec![Token::Identifier("x".to_string())]
        );
        assert_eq!(
            lex_all("x#c\n#d\n  y"),
            vec![
                Token::Identifier("x".to_string()),
                Token::Identifier("y".to_string()),
            ]
        );
    }

    #[test]
    fn test_unescape_edge_cases() {
        assert_eq!(unescape(r"\u00"), "u00");
        assert_eq!(unescape(r"tab\there"), "tab\there");
        assert_eq!(unescape(r"\\"), "\\");
    }
}
