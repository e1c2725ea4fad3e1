//! # PlanOut Compiler
//!
//! 实验定义脚本的编译前端。
//!
//! ## 架构概述
//!
//! `planout-compiler` 只负责把脚本文本变成 AST，不做求值。
//! AST 以 JSON 线格式交给外部解释器执行：
//!
//! ```text
//! 脚本文本
//!   │ tokenize()
//!   ▼
//! Vec<SpannedToken>
//!   │ Parser::parse()
//!   ▼
//! Node::Sequence ──── to_json() ───► serde_json::Value（解释器）
//!   │
//!   └──────────────── print_script() ─► 规范化源码
//! ```
//!
//! ## 使用示例
//!
//! ```ignore
//! use planout_compiler::{CompileOptions, Parser};
//!
//! let parser = Parser::with_options(CompileOptions::default());
//! let json = parser.compile_to_json("x = uniformChoice(choices=[1, 2], unit=userid);")?;
//! println!("{json}");
//! ```
//!
//! ## 模块结构
//!
//! - [`error`]：错误类型定义
//! - [`options`]：编译选项
//! - [`script`]：词法、语法、AST 与输出

pub mod error;
pub mod options;
pub mod script;

// 重导出核心类型
pub use error::{
    CompileError, CompileResult, EmbeddedLiteralError, LexError, MAX_NESTING, NestingError,
    SyntaxError,
};
pub use options::{CaseField, CompileOptions, LiteralMode};
pub use script::{
    Node, Parser, SpannedToken, Token, TokenKind, compile, parse, print_script, to_json, tokenize,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let tokens = tokenize("x = 1;").unwrap();
        assert_eq!(tokens.len(), 4);

        let root = parse(&tokens).unwrap();
        assert_eq!(root, compile("x = 1;").unwrap());

        let json = to_json(&root, &CompileOptions::default());
        assert_eq!(json["op"], "seq");
        assert_eq!(print_script(&root), "x = 1;\n");
    }
}
