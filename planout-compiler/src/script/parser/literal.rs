//! # 内嵌字面量
//!
//! `@` 之后是一个 JSON 风格的值：数组、映射或标量。读取结果原样进入
//! `Node::EmbeddedLiteral`，不再作为表达式求值。
//!
//! 标量的处理取决于 [`LiteralMode`]：
//!
//! - `Lenient`：裸标识符读作字符串，映射键可以不加引号，允许 `true`/`false`/`null`
//! - `Strict`：裸标识符交给 JSON 解码，不接受 `true`/`false`/`null`

use serde_json::{Map, Value};

use crate::error::{CompileResult, EmbeddedLiteralError};
use crate::options::LiteralMode;
use crate::script::ast::Node;
use crate::script::token::{SpannedToken, Token, TokenKind};

use super::ScriptParser;

const VALUE_START: &[TokenKind] = &[
    TokenKind::LBracket,
    TokenKind::LBrace,
    TokenKind::Identifier,
    TokenKind::Constant,
];

const LENIENT_VALUE_START: &[TokenKind] = &[
    TokenKind::LBracket,
    TokenKind::LBrace,
    TokenKind::Identifier,
    TokenKind::Constant,
    TokenKind::True,
    TokenKind::False,
    TokenKind::Null,
];

const KEY_START: &[TokenKind] = &[TokenKind::Identifier, TokenKind::Constant];

impl ScriptParser<'_> {
    /// `@value`，`@` 已被消费
    pub(super) fn parse_embedded_literal(&mut self) -> CompileResult<Node> {
        let value = self.parse_literal_value()?;
        Ok(Node::EmbeddedLiteral(value))
    }

    fn parse_literal_value(&mut self) -> CompileResult<Value> {
        let Some(token) = self.cursor.peek() else {
            return Err(self.literal_unexpected(self.value_start()).into());
        };

        match &token.token {
            Token::LBracket => {
                self.cursor.advance();
                self.nested(Self::parse_literal_array)
            }
            Token::LBrace => {
                self.cursor.advance();
                self.nested(Self::parse_literal_map)
            }
            Token::Number(n) => {
                self.cursor.advance();
                Ok(Value::Number(n.clone()))
            }
            Token::Str(s) => {
                self.cursor.advance();
                Ok(Value::String(s.clone()))
            }
            Token::Identifier(name) => {
                self.cursor.advance();
                self.decode_bare_word(token, name)
            }
            Token::True | Token::False | Token::Null if self.literal_mode == LiteralMode::Lenient => {
                self.cursor.advance();
                Ok(match token.token {
                    Token::True => Value::Bool(true),
                    Token::False => Value::Bool(false),
                    _ => Value::Null,
                })
            }
            _ => Err(self.literal_unexpected(self.value_start()).into()),
        }
    }

    /// `[` 已被消费
    fn parse_literal_array(&mut self) -> CompileResult<Value> {
        let mut values = Vec::new();
        if self.cursor.eat(TokenKind::RBracket) {
            return Ok(Value::Array(values));
        }

        loop {
            values.push(self.parse_literal_value()?);
            if self.cursor.eat(TokenKind::Comma) {
                continue;
            }
            if self.cursor.eat(TokenKind::RBracket) {
                return Ok(Value::Array(values));
            }
            return Err(self
                .literal_unexpected(&[TokenKind::Comma, TokenKind::RBracket])
                .into());
        }
    }

    /// `{` 已被消费；重复的键后者覆盖
    fn parse_literal_map(&mut self) -> CompileResult<Value> {
        let mut map = Map::new();
        if self.cursor.eat(TokenKind::RBrace) {
            return Ok(Value::Object(map));
        }

        loop {
            let key = self.parse_literal_key()?;
            if !self.cursor.eat(TokenKind::Colon) {
                return Err(self.literal_unexpected(&[TokenKind::Colon]).into());
            }
            let value = self.parse_literal_value()?;
            map.insert(key, value);

            if self.cursor.eat(TokenKind::Comma) {
                continue;
            }
            if self.cursor.eat(TokenKind::RBrace) {
                return Ok(Value::Object(map));
            }
            return Err(self
                .literal_unexpected(&[TokenKind::Comma, TokenKind::RBrace])
                .into());
        }
    }

    /// 映射键：字符串原样使用，数字取其文本形式，裸标识符按标量规则处理
    fn parse_literal_key(&mut self) -> CompileResult<String> {
        let Some(token) = self.cursor.peek() else {
            return Err(self.literal_unexpected(KEY_START).into());
        };

        match &token.token {
            Token::Str(s) => {
                self.cursor.advance();
                Ok(s.clone())
            }
            Token::Number(n) => {
                self.cursor.advance();
                Ok(n.to_string())
            }
            Token::Identifier(name) => {
                self.cursor.advance();
                match self.decode_bare_word(token, name)? {
                    Value::String(s) => Ok(s),
                    other => Ok(other.to_string()),
                }
            }
            _ => Err(self.literal_unexpected(KEY_START).into()),
        }
    }

    fn decode_bare_word(&self, token: &SpannedToken, word: &str) -> CompileResult<Value> {
        match self.literal_mode {
            LiteralMode::Lenient => Ok(Value::String(word.to_string())),
            LiteralMode::Strict => serde_json::from_str(word).map_err(|e| {
                EmbeddedLiteralError::Decode {
                    line: token.line,
                    text: word.to_string(),
                    message: e.to_string(),
                }
                .into()
            }),
        }
    }

    fn value_start(&self) -> &'static [TokenKind] {
        match self.literal_mode {
            LiteralMode::Lenient => LENIENT_VALUE_START,
            LiteralMode::Strict => VALUE_START,
        }
    }

    fn literal_unexpected(&self, expected: &[TokenKind]) -> EmbeddedLiteralError {
        EmbeddedLiteralError::Unexpected {
            line: self.cursor.line(),
            found: self.cursor.found(),
            expected: expected.to_vec(),
        }
    }
}
