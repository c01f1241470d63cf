//! 日志初始化
//!
//! 基于 tracing-subscriber，日志级别可以通过`RUST_LOG`环境变量覆盖。

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 初始化日志系统
///
/// 重复调用是安全的：已有全局订阅者时直接返回 `false`。
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let log_file = if config.log_to_file {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file_path)
        {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!(
                    "bullet_bridge: cannot open log file {}: {}",
                    config.log_file_path, e
                );
                None
            }
        }
    } else {
        None
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match (log_file, config.log_to_console) {
        (Some(file), true) => builder
            .with_ansi(false)
            .with_writer(std::io::stderr.and(Mutex::new(file)))
            .try_init()
            .is_ok(),
        (Some(file), false) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .is_ok(),
        (None, _) => builder.with_writer(std::io::stderr).try_init().is_ok(),
    };

    if installed {
        tracing::info!(target: "bridge", level = %config.level, "Logging initialized");
    }
    installed
}
