/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub mod foreign;
pub mod native;

pub use foreign::{ForeignBackend, ForeignConfig, LibraryRuntimeConfig, PythonConfig, ScriptConfig};
pub use native::{NativeBinding, NativeConfig};

use crate::{env_override, impl_default};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 桥接层主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 原生效果绑定 ("C" 与 "c plus plus")
    #[serde(default)]
    pub native: NativeConfig,

    /// 外部运行时 ("go")
    #[serde(default)]
    pub foreign: ForeignConfig,
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 按扩展名加载配置文件，`.json` 以外一律按TOML解析
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        env_override!("BULLET_BRIDGE_LOG_LEVEL" => self.logging.level);
        env_override!("BULLET_BRIDGE_FOREIGN_BACKEND" => self.foreign.backend);

        if let Some(path) = env::var_os("BULLET_BRIDGE_SCRIPT_PATH") {
            self.foreign.script.path = Some(PathBuf::from(path));
        }
        if let Some(path) = env::var_os("BULLET_BRIDGE_PYTHON_PATH") {
            self.foreign.python.search_path = PathBuf::from(path);
        }
        if let Some(path) = env::var_os("BULLET_BRIDGE_LIBRARY_PATH") {
            self.foreign.library.path = Some(PathBuf::from(path));
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.logging.validate()?;
        self.native.validate()?;
        self.foreign.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./bullet_bridge.toml
    /// 2. ./bullet_bridge.json
    /// 3. ~/.config/bullet_bridge/config.toml
    /// 4. 使用默认配置
    ///
    /// 最后应用环境变量覆盖。
    pub fn load_or_default() -> Self {
        let mut config = Self::discover().unwrap_or_else(|| {
            tracing::debug!(target: "bridge", "Using default configuration");
            Self::default()
        });
        config.apply_env_overrides();
        config
    }

    fn discover() -> Option<Self> {
        if let Ok(config) = Self::from_toml_file("bullet_bridge.toml") {
            tracing::debug!(target: "bridge", "Loaded config from bullet_bridge.toml");
            return Some(config);
        }

        if let Ok(config) = Self::from_json_file("bullet_bridge.json") {
            tracing::debug!(target: "bridge", "Loaded config from bullet_bridge.json");
            return Some(config);
        }

        let home = env::var_os("HOME")?;
        let config_path = PathBuf::from(home)
            .join(".config")
            .join("bullet_bridge")
            .join("config.toml");
        let config = Self::from_toml_file(&config_path).ok()?;
        tracing::debug!(target: "bridge", "Loaded config from {:?}", config_path);
        Some(config)
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 优先
    pub level: LogLevel,

    /// 是否输出到文件
    pub log_to_file: bool,

    /// 日志文件路径
    pub log_file_path: String,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_file: false,
    log_file_path: "bullet_bridge.log".to_string(),
    log_to_console: true,
});

impl LoggingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.log_to_file && self.log_file_path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "log_file_path must be set when log_to_file is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::ParseError(format!("unknown log level '{}'", other))),
        }
    }
}
