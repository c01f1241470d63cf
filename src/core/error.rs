//! 统一错误处理模块
//!
//! 提供整个桥接层的错误类型定义
//!
//! ## 错误类型分层
//!
//! - **记录层错误** (`RecordError`): 字节布局编解码失败
//! - **外部运行时错误** (`ForeignError`): 嵌入式解释器或外部库调用失败
//! - **效果错误** (`EffectError`): 效果处理器加载或执行失败
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析或验证失败
//!
//! `BridgeError` 汇总以上所有错误。

use thiserror::Error;

use crate::config::ConfigError;

/// 桥接层顶层错误类型
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Effect error: {0}")]
    Effect(EffectError),

    /// 外部运行时初始化失败，不可恢复
    #[error("Foreign runtime initialization failed: {0}")]
    ForeignInit(String),
}

/// 记录编解码错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid damage_by_frame flag byte: {0:#04x}")]
    InvalidFlag(u8),
}

/// 外部运行时错误
#[derive(Error, Debug, Clone)]
pub enum ForeignError {
    /// 解释器、模块或入口函数不可用
    #[error("Initialization failed: {0}")]
    Init(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Returned snapshot rejected: {0}")]
    Record(#[from] RecordError),

    #[error("Library error: {0}")]
    Library(String),
}

impl ForeignError {
    /// 初始化失败是致命错误，其余错误只终止当前效果链
    pub fn is_fatal(&self) -> bool {
        matches!(self, ForeignError::Init(_))
    }
}

/// 效果处理器错误
#[derive(Error, Debug, Clone)]
pub enum EffectError {
    #[error("Failed to load native effect: {0}")]
    Library(String),

    #[error("Foreign effect failed: {0}")]
    Foreign(#[from] ForeignError),
}

impl EffectError {
    pub fn is_fatal(&self) -> bool {
        match self {
            EffectError::Foreign(e) => e.is_fatal(),
            EffectError::Library(_) => false,
        }
    }
}

impl From<EffectError> for BridgeError {
    fn from(error: EffectError) -> Self {
        match error {
            EffectError::Foreign(ForeignError::Init(reason)) => BridgeError::ForeignInit(reason),
            other => BridgeError::Effect(other),
        }
    }
}

/// 结果类型别名
pub type BridgeResult<T> = Result<T, BridgeError>;
pub type RecordResult<T> = Result<T, RecordError>;
pub type ForeignResult<T> = Result<T, ForeignError>;
pub type EffectResult<T> = Result<T, EffectError>;
