//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use bullet_bridge::impl_default;
///
/// struct MyStruct {
///     field1: u32,
///     field2: String,
/// }
///
/// impl_default!(MyStruct {
///     field1: 0,
///     field2: String::new(),
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

/// 从环境变量覆盖单个配置字段
///
/// 变量不存在或解析失败时保留原值。
#[macro_export]
macro_rules! env_override {
    ($var:expr => $target:expr) => {
        if let Ok(val) = std::env::var($var) {
            if let Ok(parsed) = val.parse() {
                $target = parsed;
            }
        }
    };
}
