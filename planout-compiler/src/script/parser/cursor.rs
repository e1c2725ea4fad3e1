//! # 词法单元游标
//!
//! 语法分析只需要单个词法单元的前瞻；少数位置（赋值、命名参数、`case`、`then`）
//! 额外查看下一个。

use crate::error::SyntaxError;
use crate::script::token::{SpannedToken, Token, TokenKind};

/// 可以开始一个操作数的词法单元
pub(super) const EXPR_START: &[TokenKind] = &[
    TokenKind::Identifier,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Null,
    TokenKind::LBracket,
    TokenKind::LParen,
    TokenKind::LBrace,
    TokenKind::Constant,
    TokenKind::LiteralMarker,
    TokenKind::Minus,
    TokenKind::Bang,
    TokenKind::Switch,
    TokenKind::If,
    TokenKind::Return,
];

/// 可以跟在完整操作数之后的运算符
pub(super) const INFIX: &[TokenKind] = &[
    TokenKind::LBracket,
    TokenKind::Percent,
    TokenKind::Slash,
    TokenKind::Gt,
    TokenKind::Lt,
    TokenKind::EqEq,
    TokenKind::NotEq,
    TokenKind::Lte,
    TokenKind::Gte,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::OrOr,
    TokenKind::Coalesce,
    TokenKind::AndAnd,
];

pub(super) struct TokenCursor<'t> {
    tokens: &'t [SpannedToken],
    pos: usize,
    /// 输入结束时报告的行号
    eof_line: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [SpannedToken]) -> Self {
        let eof_line = tokens.last().map_or(1, |t| t.line);
        Self {
            tokens,
            pos: 0,
            eof_line,
        }
    }

    pub fn peek(&self) -> Option<&'t SpannedToken> {
        self.tokens.get(self.pos)
    }

    pub fn peek_token(&self) -> Option<&'t Token> {
        self.peek().map(|t| &t.token)
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek_kind_at(0)
    }

    pub fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::Eof, SpannedToken::kind)
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub fn advance(&mut self) -> Option<&'t SpannedToken> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// 当前词法单元为 `kind` 时消费它
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<&'t SpannedToken, SyntaxError> {
        self.expect_one_of(&[kind])
    }

    /// 消费一个种类属于 `kinds` 的词法单元，否则报告期望集合为 `kinds`
    pub fn expect_one_of(&mut self, kinds: &[TokenKind]) -> Result<&'t SpannedToken, SyntaxError> {
        match self.peek() {
            Some(token) if kinds.contains(&token.kind()) => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected(kinds)),
        }
    }

    pub fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        match self.peek_token() {
            Some(Token::Identifier(name)) => {
                self.pos += 1;
                Ok(name.clone())
            }
            _ => Err(self.unexpected(&[TokenKind::Identifier])),
        }
    }

    /// 当前行号；输入结束时为最后一个词法单元所在行
    pub fn line(&self) -> usize {
        self.peek().map_or(self.eof_line, |t| t.line)
    }

    /// 当前词法单元的原文；输入结束时为 `EOF`
    pub fn found(&self) -> String {
        self.peek()
            .map_or_else(|| TokenKind::Eof.name().to_string(), |t| t.lexeme.clone())
    }

    pub fn unexpected(&self, expected: &[TokenKind]) -> SyntaxError {
        SyntaxError {
            line: self.line(),
            found: self.found(),
            expected: expected.to_vec(),
            recoverable: false,
        }
    }
}

/// 合并多个期望集合，保持首次出现的顺序
pub(super) fn expected_of(groups: &[&[TokenKind]]) -> Vec<TokenKind> {
    let mut kinds: Vec<TokenKind> = Vec::new();
    for kind in groups.iter().flat_map(|group| group.iter()) {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }
    kinds
}
