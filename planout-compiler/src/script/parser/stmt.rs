//! # 语句解析
//!
//! 语句是赋值（`name = expr` / `name <- expr`）或任意表达式，以 `;` 结束。
//! 以下情况可以省略 `;`：
//!
//! - 输入结束或语句块的 `}` 之前
//! - 以 `if`、`switch`、`return` 开头的语句之后

use crate::error::CompileResult;
use crate::script::ast::Node;
use crate::script::token::{Token, TokenKind};

use super::ScriptParser;
use super::cursor::{EXPR_START, INFIX, expected_of};

impl ScriptParser<'_> {
    /// 解析语句列表，直到遇到 `terminator`（不消费它）
    pub(super) fn parse_rules(&mut self, terminator: TokenKind) -> CompileResult<Vec<Node>> {
        let mut rules = Vec::new();

        while !self.cursor.at(terminator) {
            if self.cursor.at(TokenKind::Eof) {
                return Err(self
                    .cursor
                    .unexpected(&expected_of(&[&[terminator], EXPR_START]))
                    .into());
            }

            let (rule, self_terminating) = self.parse_rule()?;
            rules.push(rule);

            if self.cursor.eat(TokenKind::EndStatement)
                || self.cursor.at(terminator)
                || self_terminating
            {
                continue;
            }

            return Err(self
                .cursor
                .unexpected(&expected_of(&[&[TokenKind::EndStatement], INFIX]))
                .into());
        }

        Ok(rules)
    }

    /// 解析单条语句
    ///
    /// 返回值的第二项表示该语句是否可以不带 `;`
    fn parse_rule(&mut self) -> CompileResult<(Node, bool)> {
        if let Some(Token::Identifier(name)) = self.cursor.peek_token() {
            if matches!(
                self.cursor.peek_kind_at(1),
                TokenKind::Assign | TokenKind::ArrowAssign
            ) {
                self.cursor.advance();
                self.cursor.advance();
                let value = self.parse_expression()?;
                return Ok((Node::assign(name.clone(), value), false));
            }
        }

        let self_terminating = matches!(
            self.cursor.peek_kind(),
            TokenKind::If | TokenKind::Switch | TokenKind::Return
        );
        let expr = self.parse_expression()?;
        Ok((expr, self_terminating))
    }

    /// `{ rules }`，`{` 已被消费
    pub(super) fn parse_block(&mut self) -> CompileResult<Node> {
        let rules = self.parse_rules(TokenKind::RBrace)?;
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(Node::Sequence(rules))
    }
}
