//! # Bullet Bridge
//!
//! A fixed-layout `Bullet` record shared by C, C++, Go and Python callers,
//! and a factory that builds one from an ordered list of effect tags.
//!
//! ## Features
//!
//! - **Packed record**: 25-byte `#[repr(C, packed)]` layout with a versioned little-endian codec
//! - **Tag dispatch**: `"C"`, `"c plus plus"` and `"go"` map to native, stacking and foreign handlers
//! - **Foreign runtimes**: embedded QuickJS, embedded CPython (`python` feature) or a shared library
//! - **C ABI**: `create_bullet` / `destroy_bullet` plus lifecycle entry points, see `include/bullet_bridge.h`
//!
//! ### Example
//!
//! ```no_run
//! use bullet_bridge::BulletFactory;
//!
//! let mut factory = BulletFactory::builtin();
//! let bullet = factory.create(&["C", "go"], 2)?.expect("count > 0");
//! assert_eq!(bullet.count(), 2);
//! assert_eq!(bullet.hp(), 2);
//! # Ok::<(), bullet_bridge::BridgeError>(())
//! ```
//!
//! ## Modules
//!
//! - [`record`]: record layout and codec
//! - [`effects`]: effect tags, handlers and the registry
//! - [`foreign`]: foreign language runtimes
//! - [`factory`]: the tag fold
//! - [`bindings`]: C ABI
//! - [`config`]: configuration
//! - [`core`]: errors, logging and shared macros

/// Errors, logging and shared macros
pub mod core;
/// Configuration system
pub mod config;
/// Record layout and codec
pub mod record;
/// Effect tags and handlers
pub mod effects;
/// Embedded and loaded foreign runtimes
pub mod foreign;
/// Tag fold producing bullets
pub mod factory;
/// C ABI
pub mod bindings;

pub use crate::config::BridgeConfig;
pub use crate::core::error::{BridgeError, BridgeResult, EffectError, ForeignError, RecordError};
pub use crate::core::init_logging;
pub use effects::{EffectHandler, EffectRegistry, EffectTag};
pub use factory::{BulletFactory, ForgeOutcome, Halt};
pub use foreign::ForeignRuntime;
pub use record::{Bullet, RecordCodec, Rgba, RECORD_SIZE, SCHEMA_VERSION};
