//! # Config 模块
//!
//! 命令行工具的配置。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件（`--config`，默认为工作目录下的 `planout.json`）
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;

use planout_compiler::{CaseField, CompileOptions, LiteralMode};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 未指定 `--config` 时尝试读取的文件
pub const DEFAULT_CONFIG_PATH: &str = "planout.json";

/// 配置文件内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// 编译选项，与其他字段位于同一层
    #[serde(flatten)]
    pub options: CompileOptions,

    /// 输出带缩进的 JSON
    #[serde(default)]
    pub pretty: bool,
}

/// 命令行上对配置的覆盖
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub strict_literals: bool,
    pub case_field: Option<CaseField>,
    pub pretty: bool,
}

impl CliConfig {
    /// 从文件加载配置
    ///
    /// 文件不存在时使用默认配置；读取或解析失败时记录警告并使用默认配置。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    info!(path = %path.display(), "配置文件加载成功");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "配置文件解析失败，使用默认配置");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "配置文件读取失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 应用命令行覆盖
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if overrides.strict_literals {
            self.options.literal_mode = LiteralMode::Strict;
        }
        if let Some(case_field) = overrides.case_field {
            self.options.case_field = case_field;
        }
        self.pretty |= overrides.pretty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load(dir.path().join("nope.json"));
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_load_flattened_options() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"literal_mode": "strict", "pretty": true}}"#
        )
        .unwrap();

        let config = CliConfig::load(file.path());
        assert_eq!(config.options.literal_mode, LiteralMode::Strict);
        assert_eq!(config.options.case_field, CaseField::Legacy);
        assert!(config.pretty);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"case_field": "condition"}}"#).unwrap();
        assert_eq!(CliConfig::load(file.path()), CliConfig::default());
    }

    #[test]
    fn test_command_line_wins() {
        let config = CliConfig {
            options: CompileOptions {
                literal_mode: LiteralMode::Lenient,
                case_field: CaseField::Corrected,
            },
            pretty: true,
        };

        let merged = config.clone().apply(Overrides {
            strict_literals: true,
            case_field: Some(CaseField::Legacy),
            pretty: false,
        });
        assert_eq!(merged.options.literal_mode, LiteralMode::Strict);
        assert_eq!(merged.options.case_field, CaseField::Legacy);
        assert!(merged.pretty);

        assert_eq!(config.clone().apply(Overrides::default()), config);
    }
}
