use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigResult};
use crate::impl_default;

/// 外部运行时后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForeignBackend {
    /// 嵌入式 QuickJS
    Script,
    /// 嵌入式 CPython (需要 `python` feature)
    Python,
    /// 动态库导出的字节变换函数
    Library,
}

impl fmt::Display for ForeignBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ForeignBackend::Script => "script",
            ForeignBackend::Python => "python",
            ForeignBackend::Library => "library",
        })
    }
}

impl FromStr for ForeignBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "script" | "js" | "quickjs" => Ok(ForeignBackend::Script),
            "python" | "py" => Ok(ForeignBackend::Python),
            "library" | "lib" => Ok(ForeignBackend::Library),
            other => Err(ConfigError::ParseError(format!(
                "unknown foreign backend '{}'",
                other
            ))),
        }
    }
}

/// 外部运行时配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignConfig {
    pub backend: ForeignBackend,
    pub script: ScriptConfig,
    pub python: PythonConfig,
    pub library: LibraryRuntimeConfig,
}

impl_default!(ForeignConfig {
    backend: ForeignBackend::Script,
    script: ScriptConfig::default(),
    python: PythonConfig::default(),
    library: LibraryRuntimeConfig::default(),
});

impl ForeignConfig {
    /// 只验证当前选中的后端
    pub fn validate(&self) -> ConfigResult<()> {
        match self.backend {
            ForeignBackend::Script => require_name("foreign.script.entry_point", &self.script.entry_point),
            ForeignBackend::Python => {
                require_name("foreign.python.module", &self.python.module)?;
                require_name("foreign.python.function", &self.python.function)
            }
            ForeignBackend::Library => {
                if self.library.path.is_none() {
                    return Err(ConfigError::ValidationError(
                        "foreign.library.path is required for the library backend".to_string(),
                    ));
                }
                require_name("foreign.library.symbol", &self.library.symbol)
            }
        }
    }
}

/// QuickJS 脚本配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// 脚本路径，为空时使用内置脚本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// 入口函数名
    pub entry_point: String,
}

impl_default!(ScriptConfig {
    path: None,
    entry_point: "bullet_effect".to_string(),
});

/// CPython 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// 追加到 `sys.path` 的目录
    pub search_path: PathBuf,
    pub module: String,
    pub function: String,
}

impl_default!(PythonConfig {
    search_path: PathBuf::from("scripts"),
    module: "ffi".to_string(),
    function: "py_create_bullet".to_string(),
});

/// 动态库后端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryRuntimeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub symbol: String,
}

impl_default!(LibraryRuntimeConfig {
    path: None,
    symbol: "bullet_transform".to_string(),
});

pub(crate) fn require_name(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}
