use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::foreign::require_name;
use super::ConfigResult;
use crate::impl_default;

/// 原生效果绑定
///
/// `library` 为空时使用内置实现，否则从动态库中解析 `symbol`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,
    pub symbol: String,
}

impl NativeBinding {
    pub fn builtin(symbol: impl Into<String>) -> Self {
        Self {
            library: None,
            symbol: symbol.into(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.library.is_none()
    }
}

/// 原生效果配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    /// "C" 标签
    pub c: NativeBinding,
    /// "c plus plus" 标签
    pub cpp: NativeBinding,
}

impl_default!(NativeConfig {
    c: NativeBinding::builtin("c_create_bullet"),
    cpp: NativeBinding::builtin("cpp_create_bullet"),
});

impl NativeConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.c.is_builtin() {
            require_name("native.c.symbol", &self.c.symbol)?;
        }
        if !self.cpp.is_builtin() {
            require_name("native.cpp.symbol", &self.cpp.symbol)?;
        }
        Ok(())
    }
}
