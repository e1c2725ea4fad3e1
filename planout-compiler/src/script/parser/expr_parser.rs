//! # 表达式解析器
//!
//! 递归下降表达式解析器，每个优先级一层，从最松到最紧：
//!
//! | 层级 | 运算符 | 节点 |
//! |---|---|---|
//! | 1 | `\|\|` `??` | `Or` / `Coalesce` |
//! | 2 | `&&` | `And` |
//! | 3 | `==` `!=` | `Equals` / `Not(Equals)` |
//! | 4 | `>` `<` `>=` `<=` | 比较 |
//! | 5 | `+` `-` | `Sum` / `Sum([l, Negate(r)])` |
//! | 6 | `*` `/` `%` | `Product` / `Div` / `Mod` |
//! | 7 | 前缀 `!` `-` | `Not` / `Negate` |
//! | 8 | 后缀 `[i]`、调用 `name(...)` | `Index` / `Call` |
//! | 9 | 基本表达式 | 字面量、变量、括号、数组、块、`@`、`switch`、`if`、`return` |
//!
//! 除前缀运算外均为左结合。变长运算在同一条运算链中连续出现时折叠进同一个节点。

use crate::error::CompileResult;
use crate::script::ast::{BinaryOp, Branch, CallArgs, Case, Guard, NamedArgs, Node, VariadicOp};
use crate::script::token::{Token, TokenKind};

use super::ScriptParser;
use super::cursor::{EXPR_START, INFIX, expected_of};

/// 把右操作数并入左操作数
///
/// `chained` 表示左操作数是本条运算链上一步用同一运算符产生的节点；
/// 此时直接追加，否则新建一个二元素节点。括号内的同类节点因此保持独立。
fn fold_variadic(left: Node, op: VariadicOp, right: Node, chained: bool) -> Node {
    match left {
        Node::Variadic {
            op: left_op,
            mut values,
        } if chained && left_op == op => {
            values.push(right);
            Node::Variadic { op, values }
        }
        left => Node::variadic(op, vec![left, right]),
    }
}

impl ScriptParser<'_> {
    /// 解析完整表达式（最低优先级）
    ///
    /// 括号、数组、块、调用参数与控制结构都经由这里递归，每次计一层嵌套。
    pub(super) fn parse_expression(&mut self) -> CompileResult<Node> {
        self.nested(Self::parse_or)
    }

    /// `||` 与 `??` 同层，从左到右
    fn parse_or(&mut self) -> CompileResult<Node> {
        let mut left = self.parse_and()?;
        let mut last: Option<VariadicOp> = None;

        loop {
            let op = match self.cursor.peek_kind() {
                TokenKind::OrOr => VariadicOp::Or,
                TokenKind::Coalesce => VariadicOp::Coalesce,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_and()?;
            left = fold_variadic(left, op, right, last == Some(op));
            last = Some(op);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> CompileResult<Node> {
        let mut left = self.parse_equality()?;
        let mut chained = false;

        while self.cursor.eat(TokenKind::AndAnd) {
            let right = self.parse_equality()?;
            left = fold_variadic(left, VariadicOp::And, right, chained);
            chained = true;
        }

        Ok(left)
    }

    /// 比较运算总是成对组合：`a == b == c` 即 `(a == b) == c`
    fn parse_equality(&mut self) -> CompileResult<Node> {
        let mut left = self.parse_relational()?;

        loop {
            match self.cursor.peek_kind() {
                TokenKind::EqEq => {
                    self.cursor.advance();
                    let right = self.parse_relational()?;
                    left = Node::binary(BinaryOp::Equals, left, right);
                }
                TokenKind::NotEq => {
                    self.cursor.advance();
                    let right = self.parse_relational()?;
                    left = Node::not_equals(left, right);
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_relational(&mut self) -> CompileResult<Node> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.cursor.peek_kind() {
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gte => BinaryOp::Gte,
                TokenKind::Lte => BinaryOp::Lte,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_additive()?;
            left = Node::binary(op, left, right);
        }

        Ok(left)
    }

    /// `-` 不产生差节点，而是并入 `Sum` 并对右操作数取负
    fn parse_additive(&mut self) -> CompileResult<Node> {
        let mut left = self.parse_multiplicative()?;
        let mut chained = false;

        loop {
            let negate = match self.cursor.peek_kind() {
                TokenKind::Plus => false,
                TokenKind::Minus => true,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_multiplicative()?;
            let right = if negate { Node::negate(right) } else { right };
            left = fold_variadic(left, VariadicOp::Sum, right, chained);
            chained = true;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> CompileResult<Node> {
        let mut left = self.parse_unary()?;
        let mut chained = false;

        loop {
            match self.cursor.peek_kind() {
                TokenKind::Star => {
                    self.cursor.advance();
                    let right = self.parse_unary()?;
                    left = fold_variadic(left, VariadicOp::Product, right, chained);
                    chained = true;
                }
                TokenKind::Slash => {
                    self.cursor.advance();
                    let right = self.parse_unary()?;
                    left = Node::binary(BinaryOp::Div, left, right);
                    chained = false;
                }
                TokenKind::Percent => {
                    self.cursor.advance();
                    let right = self.parse_unary()?;
                    left = Node::binary(BinaryOp::Mod, left, right);
                    chained = false;
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> CompileResult<Node> {
        if self.cursor.eat(TokenKind::Bang) {
            let value = self.nested(Self::parse_unary)?;
            return Ok(Node::not(value));
        }
        if self.cursor.eat(TokenKind::Minus) {
            let value = self.nested(Self::parse_unary)?;
            return Ok(Node::negate(value));
        }
        self.parse_postfix()
    }

    /// 下标可以连续出现：`a[1][2]`
    fn parse_postfix(&mut self) -> CompileResult<Node> {
        let mut base = self.parse_primary()?;

        while self.cursor.eat(TokenKind::LBracket) {
            let index = self.parse_expression()?;
            self.cursor
                .expect_one_of(&expected_of(&[&[TokenKind::RBracket], INFIX]))?;
            base = Node::index(base, index);
        }

        Ok(base)
    }

    /// 解析基本表达式
    fn parse_primary(&mut self) -> CompileResult<Node> {
        let Some(token) = self.cursor.peek() else {
            return Err(self.cursor.unexpected(EXPR_START).into());
        };

        match &token.token {
            Token::Identifier(name) => {
                self.cursor.advance();
                if self.cursor.eat(TokenKind::LParen) {
                    let args = self.parse_call_args()?;
                    Ok(Node::call(name.clone(), args))
                } else {
                    Ok(Node::var(name.clone()))
                }
            }
            Token::True => {
                self.cursor.advance();
                Ok(Node::bool(true))
            }
            Token::False => {
                self.cursor.advance();
                Ok(Node::bool(false))
            }
            Token::Null => {
                self.cursor.advance();
                Ok(Node::null())
            }
            Token::Number(n) => {
                self.cursor.advance();
                Ok(Node::number(n.clone()))
            }
            Token::Str(s) => {
                self.cursor.advance();
                Ok(Node::string(s.clone()))
            }
            Token::LBracket => {
                self.cursor.advance();
                let values = self.parse_array_values()?;
                Ok(Node::Array(values))
            }
            Token::LParen => {
                self.cursor.advance();
                let inner = self.parse_expression()?;
                self.cursor
                    .expect_one_of(&expected_of(&[&[TokenKind::RParen], INFIX]))?;
                Ok(inner)
            }
            Token::LBrace => {
                self.cursor.advance();
                self.parse_block()
            }
            Token::LiteralMarker => {
                self.cursor.advance();
                self.parse_embedded_literal()
            }
            Token::Switch => {
                self.cursor.advance();
                self.parse_switch()
            }
            Token::If => {
                self.cursor.advance();
                let branches = self.parse_if_chain()?;
                Ok(Node::Cond(branches))
            }
            Token::Return => {
                self.cursor.advance();
                let value = self.parse_expression()?;
                Ok(Node::ret(value))
            }
            _ => Err(self.cursor.unexpected(EXPR_START).into()),
        }
    }

    /// `[a, b, c]`，`[` 已被消费；允许空数组
    fn parse_array_values(&mut self) -> CompileResult<Vec<Node>> {
        let mut values = Vec::new();
        if self.cursor.eat(TokenKind::RBracket) {
            return Ok(values);
        }

        loop {
            values.push(self.parse_expression()?);
            let separator = self.cursor.expect_one_of(&expected_of(&[
                &[TokenKind::Comma, TokenKind::RBracket],
                INFIX,
            ]))?;
            if separator.kind() == TokenKind::RBracket {
                return Ok(values);
            }
        }
    }

    /// 运算符调用参数，`(` 已被消费
    ///
    /// - `f()`：空的命名参数表
    /// - `f(a, b)`：位置参数
    /// - `f(k = a, m: b)`：命名参数，重复的键后者覆盖
    fn parse_call_args(&mut self) -> CompileResult<CallArgs> {
        if self.cursor.eat(TokenKind::RParen) {
            return Ok(CallArgs::default());
        }

        if self.at_named_argument() {
            let mut named = NamedArgs::new();
            loop {
                let name = self.cursor.expect_identifier()?;
                self.cursor
                    .expect_one_of(&[TokenKind::Assign, TokenKind::Colon])?;
                let value = self.parse_expression()?;
                named.insert(name, value);

                let separator = self.cursor.expect_one_of(&expected_of(&[
                    &[TokenKind::Comma, TokenKind::RParen],
                    INFIX,
                ]))?;
                if separator.kind() == TokenKind::RParen {
                    return Ok(CallArgs::Named(named));
                }
            }
        }

        let mut values = Vec::new();
        loop {
            values.push(self.parse_expression()?);
            let separator = self.cursor.expect_one_of(&expected_of(&[
                &[TokenKind::Comma, TokenKind::RParen],
                INFIX,
            ]))?;
            if separator.kind() == TokenKind::RParen {
                return Ok(CallArgs::Positional(values));
            }
        }
    }

    fn at_named_argument(&self) -> bool {
        self.cursor.at(TokenKind::Identifier)
            && matches!(
                self.cursor.peek_kind_at(1),
                TokenKind::Assign | TokenKind::Colon
            )
    }

    /// `if (cond) [then] consequence [else ...]`，`if` 已被消费
    ///
    /// `else if` 展平进同一个分支列表；其他 `else` 表达式作为守卫恒真的末尾分支。
    fn parse_if_chain(&mut self) -> CompileResult<Vec<Branch>> {
        self.cursor.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.cursor
            .expect_one_of(&expected_of(&[&[TokenKind::RParen], INFIX]))?;
        if self.at_contextual_keyword("then") {
            self.cursor.advance();
        }
        let consequence = self.parse_expression()?;

        let mut branches = vec![Branch {
            guard: Guard::When(condition),
            then: consequence,
        }];

        if self.cursor.eat(TokenKind::Else) {
            if self.cursor.eat(TokenKind::If) {
                branches.extend(self.parse_if_chain()?);
            } else {
                branches.push(Branch {
                    guard: Guard::Always,
                    then: self.parse_expression()?,
                });
            }
        }

        Ok(branches)
    }

    /// `switch { guard => result; ... }`，`switch` 已被消费
    ///
    /// 也接受 `case guard: result` 形式；分支之间的 `;` 可省略。
    fn parse_switch(&mut self) -> CompileResult<Node> {
        self.cursor.expect(TokenKind::LBrace)?;
        let mut cases = Vec::new();

        loop {
            if self.cursor.eat(TokenKind::RBrace) {
                return Ok(Node::Switch(cases));
            }
            if self.cursor.at(TokenKind::Eof) {
                return Err(self
                    .cursor
                    .unexpected(&expected_of(&[&[TokenKind::RBrace], EXPR_START]))
                    .into());
            }

            if self.at_contextual_keyword("case") {
                self.cursor.advance();
            }
            let guard = self.parse_expression()?;
            self.cursor.expect_one_of(&expected_of(&[
                &[TokenKind::Then, TokenKind::Colon],
                INFIX,
            ]))?;
            let result = self.parse_expression()?;
            cases.push(Case { guard, result });

            self.cursor.eat(TokenKind::EndStatement);
        }
    }

    /// 上下文关键字：switch 分支开头的 `case`、条件之后的 `then`
    ///
    /// 其后的词法单元能开始操作数且不是中缀运算符时才是关键字；
    /// `case => 1`、`case[0]`、`then + 1` 中仍是变量名。
    fn at_contextual_keyword(&self, word: &str) -> bool {
        let next = self.cursor.peek_kind_at(1);
        matches!(self.cursor.peek_token(), Some(Token::Identifier(name)) if name == word)
            && EXPR_START.contains(&next)
            && !INFIX.contains(&next)
    }
}
