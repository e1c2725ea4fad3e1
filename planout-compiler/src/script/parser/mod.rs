//! # Parser 模块
//!
//! 手写递归下降解析器，按固定的优先级分层处理运算符。
//!
//! ## 架构
//!
//! ```text
//! 原始文本 → [lexer] → Vec<SpannedToken> → [parser] → Node::Sequence
//!                                              │
//!                                              └─ 遇到 `@` 时进入内嵌字面量读取
//! ```
//!
//! ## 设计原则
//!
//! - 解析状态只存在于单次调用内部，`Parser` 本身不可变，可跨线程共享
//! - 遇到第一个错误立即失败，不做错误恢复，不返回部分 AST
//! - 嵌套层数有上限（[`MAX_NESTING`]），超出时返回错误而不是耗尽栈
//!
//! ## 模块结构
//!
//! - `cursor`: 词法单元游标与期望集合
//! - `stmt`: 语句与语句块
//! - `expr_parser`: 表达式优先级分层
//! - `literal`: `@` 内嵌字面量

mod cursor;
mod expr_parser;
mod literal;
mod stmt;


use serde_json::Value;
use tracing::debug;

use crate::error::{CompileResult, MAX_NESTING, NestingError};
use crate::options::{CompileOptions, LiteralMode};
use crate::script::ast::Node;
use crate::script::lexer::tokenize;
use crate::script::token::{SpannedToken, TokenKind};
use crate::script::wire::to_json;

use cursor::TokenCursor;

/// 脚本解析器
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: CompileOptions,
}

impl Parser {
    /// 使用默认选项创建解析器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// 解析词法单元序列
    ///
    /// # 返回
    ///
    /// 根节点总是 `Node::Sequence`，子节点为源码顺序的顶层语句
    pub fn parse(&self, tokens: &[SpannedToken]) -> CompileResult<Node> {
        let mut state = ScriptParser::new(tokens, self.options.literal_mode);
        let rules = state.parse_rules(TokenKind::Eof)?;
        debug!(statements = rules.len(), "语法分析完成");
        Ok(Node::Sequence(rules))
    }

    /// 词法分析并解析脚本文本
    pub fn compile(&self, source: &str) -> CompileResult<Node> {
        let tokens = tokenize(source)?;
        debug!(tokens = tokens.len(), options = ?self.options, "开始编译");
        self.parse(&tokens)
    }

    /// 编译为解释器读取的 JSON 线格式
    pub fn compile_to_json(&self, source: &str) -> CompileResult<Value> {
        let root = self.compile(source)?;
        Ok(to_json(&root, &self.options))
    }
}

/// 使用默认选项解析词法单元序列
pub fn parse(tokens: &[SpannedToken]) -> CompileResult<Node> {
    Parser::new().parse(tokens)
}

/// 使用默认选项编译脚本文本
pub fn compile(source: &str) -> CompileResult<Node> {
    Parser::new().compile(source)
}

/// 单次解析的状态
struct ScriptParser<'t> {
    cursor: TokenCursor<'t>,
    literal_mode: LiteralMode,
    /// 当前嵌套层数
    depth: usize,
}

impl<'t> ScriptParser<'t> {
    fn new(tokens: &'t [SpannedToken], literal_mode: LiteralMode) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            literal_mode,
            depth: 0,
        }
    }

    /// 进入一层嵌套执行 `parse`
    ///
    /// 出错时整个解析终止，因此只在成功路径上恢复层数。
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> CompileResult<T>,
    ) -> CompileResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(NestingError {
                line: self.cursor.line(),
                limit: MAX_NESTING,
            }
            .into());
        }
        self.depth += 1;
        let result = parse(self)?;
        self.depth -= 1;
        Ok(result)
    }
}
