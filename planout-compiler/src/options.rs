//! # Options 模块
//!
//! 编译选项。所有字段都有默认值，可以从 JSON 配置文件部分覆盖。

use serde::{Deserialize, Serialize};

/// 内嵌字面量中标量的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralMode {
    /// 裸标识符视为字符串，映射键可以不加引号，允许 `true`/`false`/`null`
    #[default]
    Lenient,
    /// 裸标识符交给 JSON 解码（因而失败），
    /// 不接受 `true`/`false`/`null`
    Strict,
}

/// switch 分支守卫在线格式中的字段名
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseField {
    /// `condidion`：现有解释器读取的拼写
    #[default]
    Legacy,
    /// `condition`：需要解释器同步修改
    Corrected,
}

impl CaseField {
    pub fn field_name(self) -> &'static str {
        match self {
            CaseField::Legacy => "condidion",
            CaseField::Corrected => "condition",
        }
    }
}

/// 编译选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    #[serde(default)]
    pub literal_mode: LiteralMode,

    #[serde(default)]
    pub case_field: CaseField,
}

impl CompileOptions {
    /// 严格字面量，保留 `condidion` 字段
    pub fn strict() -> Self {
        Self {
            literal_mode: LiteralMode::Strict,
            case_field: CaseField::Legacy,
        }
    }
}
