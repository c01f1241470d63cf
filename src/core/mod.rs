//! 核心基础设施：错误类型、日志与公共宏

pub mod error;
pub mod logging;
#[macro_use]
pub mod macros;

pub use error::*;
pub use logging::init_logging;
