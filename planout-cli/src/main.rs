//! # planoutc
//!
//! 将实验定义脚本编译为解释器执行的 JSON。
//!
//! ## 用法
//!
//! ```bash
//! planoutc compile experiment.planout -o experiment.json
//! planoutc compile - --pretty < experiment.planout
//! planoutc compile experiment.planout --strict-literals --case-field corrected
//! planoutc tokens experiment.planout
//! planoutc fmt experiment.planout
//! planoutc check scripts/*.planout
//! ```

mod commands;
mod config;

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use planout_compiler::CaseField;
use tracing::{Level, debug, error, info};

use config::{CliConfig, DEFAULT_CONFIG_PATH, Overrides};

#[derive(Parser)]
#[command(name = "planoutc")]
#[command(about = "将实验定义脚本编译为解释器执行的 JSON")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件（默认：工作目录下的 planout.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 输出更多日志（可重复：-v、-vv、-vvv）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// 只输出错误
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 编译脚本，输出 JSON
    Compile {
        /// 脚本文件，`-` 表示标准输入
        input: PathBuf,

        /// 输出文件（默认：标准输出）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 输出带缩进的 JSON
        #[arg(long)]
        pretty: bool,

        /// 内嵌字面量使用严格模式
        #[arg(long)]
        strict_literals: bool,

        /// switch 分支守卫的字段名
        #[arg(long, value_enum)]
        case_field: Option<CaseFieldArg>,
    },

    /// 列出词法单元
    Tokens {
        /// 脚本文件，`-` 表示标准输入
        input: PathBuf,
    },

    /// 输出规范化的脚本源码
    Fmt {
        /// 脚本文件，`-` 表示标准输入
        input: PathBuf,
    },

    /// 检查脚本能否编译，任一失败时以非零状态退出
    Check {
        /// 脚本文件
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CaseFieldArg {
    /// `condidion`
    Legacy,
    /// `condition`
    Corrected,
}

impl From<CaseFieldArg> for CaseField {
    fn from(arg: CaseFieldArg) -> Self {
        match arg {
            CaseFieldArg::Legacy => CaseField::Legacy,
            CaseFieldArg::Corrected => CaseField::Corrected,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// 执行子命令；返回 `false` 表示有脚本未通过检查
fn run(cli: Cli) -> Result<bool> {
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Compile {
            input,
            output,
            pretty,
            strict_literals,
            case_field,
        } => {
            let config = config.apply(Overrides {
                strict_literals,
                case_field: case_field.map(CaseField::from),
                pretty,
            });
            debug!(?config, "生效的配置");

            let source = read_source(&input)?;
            let json = commands::compile_source(&source, &config.options, config.pretty)
                .with_context(|| format!("编译 {} 失败", input.display()))?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Tokens { input } => {
            let source = read_source(&input)?;
            let listing = commands::render_tokens(&source)
                .with_context(|| format!("词法分析 {} 失败", input.display()))?;
            write_output(None, listing.trim_end())?;
        }
        Commands::Fmt { input } => {
            let source = read_source(&input)?;
            let formatted = commands::format_source(&source, &config.options)
                .with_context(|| format!("格式化 {} 失败", input.display()))?;
            write_output(None, formatted.trim_end())?;
        }
        Commands::Check { inputs } => {
            let mut failed = 0usize;
            for input in &inputs {
                let result = read_source(input)
                    .and_then(|source| commands::check_source(&source, &config.options));
                match result {
                    Ok(statements) => info!(path = %input.display(), statements, "通过"),
                    Err(e) => {
                        failed += 1;
                        error!("{}: {e:#}", input.display());
                    }
                }
            }

            if failed > 0 {
                error!(failed, total = inputs.len(), "检查未通过");
                return Ok(false);
            }
            info!(total = inputs.len(), "全部通过");
        }
    }

    Ok(true)
}

fn load_config(path: Option<&Path>) -> CliConfig {
    match path {
        Some(path) => CliConfig::load(path),
        None => CliConfig::load(DEFAULT_CONFIG_PATH),
    }
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("读取标准输入失败")?;
        return Ok(source);
    }

    fs::read_to_string(path).with_context(|| format!("读取 {} 失败", path.display()))
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("写入 {} 失败", path.display()))?;
            info!(path = %path.display(), "已写入");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{text}").context("写入标准输出失败")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compile_arguments() {
        let cli = Cli::try_parse_from([
            "planoutc",
            "-vv",
            "compile",
            "exp.planout",
            "--case-field",
            "corrected",
            "--strict-literals",
            "-o",
            "exp.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Compile {
                input,
                output,
                strict_literals,
                case_field,
                pretty,
            } => {
                assert_eq!(input, PathBuf::from("exp.planout"));
                assert_eq!(output, Some(PathBuf::from("exp.json")));
                assert!(strict_literals);
                assert!(!pretty);
                assert!(matches!(case_field, Some(CaseFieldArg::Corrected)));
            }
            _ => panic!("期望 compile 子命令"),
        }
    }

    #[test]
    fn test_check_requires_inputs() {
        assert!(Cli::try_parse_from(["planoutc", "check"]).is_err());
        assert!(Cli::try_parse_from(["planoutc", "-q", "-v", "check", "a"]).is_err());
    }

    #[test]
    fn test_compile_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("exp.planout");
        let output = dir.path().join("exp.json");
        let missing = dir.path().join("missing.json");
        fs::write(&input, "x = 1;\n").unwrap();

        let cli = Cli::try_parse_from([
            OsStr::new("planoutc"),
            OsStr::new("--config"),
            missing.as_os_str(),
            OsStr::new("compile"),
            input.as_os_str(),
            OsStr::new("-o"),
            output.as_os_str(),
        ])
        .unwrap();

        assert!(run(cli).unwrap());
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "{\"op\":\"seq\",\"seq\":[{\"op\":\"set\",\"var\":\"x\",\"value\":1}]}\n"
        );
    }

    #[test]
    fn test_check_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.planout");
        let bad = dir.path().join("bad.planout");
        fs::write(&good, "x = 1;").unwrap();
        fs::write(&bad, "x = ;").unwrap();

        let missing = dir.path().join("missing.json");

        let cli = Cli::try_parse_from([
            OsStr::new("planoutc"),
            OsStr::new("--config"),
            missing.as_os_str(),
            OsStr::new("check"),
            good.as_os_str(),
            bad.as_os_str(),
        ])
        .unwrap();

        assert!(!run(cli).unwrap());
    }
}
