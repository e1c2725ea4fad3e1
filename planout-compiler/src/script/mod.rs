//! # Script 模块
//!
//! 脚本编译前端：词法分析、语法分析、AST 定义，以及 AST 的两种输出形式。
//!
//! ## 模块结构
//!
//! - [`token`]：词法单元定义
//! - [`lexer`]：把源码切分为带行号的词法单元
//! - [`ast`]：脚本抽象语法树定义
//! - [`parser`]：递归下降解析器
//! - [`wire`]：解释器读取的 JSON 线格式
//! - [`printer`]：规范化的脚本源码

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;
pub mod wire;

pub use ast::*;
pub use lexer::tokenize;
pub use parser::{Parser, compile, parse};
pub use printer::print_script;
pub use token::{SpannedToken, Token, TokenKind};
pub use wire::to_json;
