//! # Commands 模块
//!
//! 各子命令的实现。输入输出由 `main` 负责，这里只做文本到文本的转换。

use std::fmt::Write as _;

use anyhow::Result;
use planout_compiler::{CompileOptions, Parser, print_script, tokenize};
use tracing::debug;

/// 编译为 JSON 文本
pub fn compile_source(source: &str, options: &CompileOptions, pretty: bool) -> Result<String> {
    let json = Parser::with_options(options.clone()).compile_to_json(source)?;
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    debug!(bytes = text.len(), "JSON 输出完成");
    Ok(text)
}

/// 每行一个词法单元：`行号  种类  原文`
pub fn render_tokens(source: &str) -> Result<String> {
    let mut out = String::new();
    for token in tokenize(source)? {
        writeln!(out, "{:>4}  {:<12}  {}", token.line, token.kind().name(), token.lexeme)?;
    }
    Ok(out)
}

/// 只做编译检查，返回顶层语句数
pub fn check_source(source: &str, options: &CompileOptions) -> Result<usize> {
    let root = Parser::with_options(options.clone()).compile(source)?;
    Ok(root.children().len())
}

/// 规范化脚本源码
pub fn format_source(source: &str, options: &CompileOptions) -> Result<String> {
    let root = Parser::with_options(options.clone()).compile(source)?;
    Ok(print_script(&root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_source_compact_and_pretty() {
        let options = CompileOptions::default();
        assert_eq!(
            compile_source("x = 1;", &options, false).unwrap(),
            r#"{"op":"seq","seq":[{"op":"set","var":"x","value":1}]}"#
        );

        let pretty = compile_source("x = 1;", &options, true).unwrap();
        assert!(pretty.contains('\n'));
        assert!(pretty.starts_with("{\n  \"op\": \"seq\""));
    }

    #[test]
    fn test_compile_error_is_reported() {
        let err = compile_source("x = ;", &CompileOptions::default(), false).unwrap_err();
        assert!(err.to_string().contains("第 1 行"));
    }

    #[test]
    fn test_check_source() {
        let options = CompileOptions::default();
        assert_eq!(check_source("a = 1; b = 2; c", &options).unwrap(), 3);
        assert!(check_source("a = @{k: 1};", &CompileOptions::strict()).is_err());
    }

    #[test]
    fn test_render_tokens() {
        let out = render_tokens("a <- 1;\nb").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("'<-'"));
        assert!(lines[2].contains("CONST"));
        assert!(lines[4].trim_start().starts_with('2'));
    }

    #[test]
    fn test_format_source() {
        let formatted =
            format_source("x=a+b*c;if(x>1){y=2}else y=3", &CompileOptions::default());
        assert!(formatted.is_err());

        let formatted =
            format_source("x=a+b*c;if(x>1){y=2}else{y=3}", &CompileOptions::default()).unwrap();
        assert_eq!(
            formatted,
            "x = (a + (b * c));\nif ((x > 1)) ({ y = 2; }) else ({ y = 3; });\n"
        );
    }
}
