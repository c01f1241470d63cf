//! Foreign runtime adapters
//!
//! A foreign runtime never sees the caller's record. It receives a
//! little-endian snapshot of exactly [`RECORD_SIZE`] bytes and returns a new
//! snapshot, which is validated before it replaces the record.
//!
//! ```text
//!  Bullet ──encode──▶ [u8; 25] ──transform──▶ Vec<u8> ──decode──▶ Bullet
//!                                  │
//!                  QuickJS │ CPython │ shared library
//! ```
//!
//! Runtimes initialize lazily on first use behind a `OnceLock`. A failed
//! initialization is remembered and reported as [`ForeignError::Init`] on
//! every later call; it is never retried.

pub mod library;
#[cfg(feature = "python")]
pub mod python;
pub mod script;

pub use library::LibraryRuntime;
#[cfg(feature = "python")]
pub use python::PythonRuntime;
pub use script::{ScriptRuntime, ScriptSource};

use crate::config::{ConfigError, ForeignBackend, ForeignConfig};
use crate::core::error::{BridgeResult, ForeignError, ForeignResult};
use crate::record::{Bullet, RecordCodec, RECORD_SIZE};

/// A language runtime that transforms record snapshots
pub trait ForeignRuntime: Send {
    /// Short runtime name used in logs
    fn name(&self) -> &str;

    /// Forces initialization. Calling this more than once is cheap.
    fn initialize(&self) -> ForeignResult<()>;

    /// Transforms one snapshot. Implementations initialize on first call.
    fn transform(&self, snapshot: &[u8]) -> ForeignResult<Vec<u8>>;

    /// Releases the runtime's state. A later `transform` initializes again.
    fn shutdown(&mut self) {}
}

/// Applies a foreign runtime to a record through the codec
pub struct ForeignHandler {
    runtime: Box<dyn ForeignRuntime>,
}

impl ForeignHandler {
    pub fn new(runtime: impl ForeignRuntime + 'static) -> Self {
        Self::from_boxed(Box::new(runtime))
    }

    pub fn from_boxed(runtime: Box<dyn ForeignRuntime>) -> Self {
        Self { runtime }
    }

    pub fn runtime_name(&self) -> &str {
        self.runtime.name()
    }

    pub fn initialize(&self) -> ForeignResult<()> {
        self.runtime.initialize()
    }

    /// Round-trips the record through the runtime. The record is only
    /// overwritten once the returned snapshot has decoded cleanly.
    pub fn apply(&self, bullet: &mut Bullet) -> ForeignResult<()> {
        let snapshot = RecordCodec::encode(bullet);
        let returned = self.runtime.transform(&snapshot)?;

        if returned.len() != RECORD_SIZE {
            tracing::error!(
                target: "bridge.foreign",
                runtime = self.runtime.name(),
                expected = RECORD_SIZE,
                actual = returned.len(),
                "Foreign runtime returned a snapshot of the wrong size"
            );
        }
        let updated = RecordCodec::decode(&returned)?;

        tracing::debug!(
            target: "bridge.foreign",
            runtime = self.runtime.name(),
            hp_before = bullet.hp(),
            hp_after = updated.hp(),
            "Foreign effect applied"
        );
        *bullet = updated;
        Ok(())
    }

    pub fn shutdown(&mut self) {
        tracing::debug!(target: "bridge.foreign", runtime = self.runtime.name(), "Shutting down");
        self.runtime.shutdown();
    }
}

/// Builds the runtime selected by `config.backend`.
pub fn runtime_from_config(config: &ForeignConfig) -> BridgeResult<Box<dyn ForeignRuntime>> {
    match config.backend {
        ForeignBackend::Script => Ok(Box::new(ScriptRuntime::from_config(&config.script))),
        ForeignBackend::Library => {
            let path = config.library.path.clone().ok_or_else(|| {
                ConfigError::ValidationError(
                    "foreign.library.path is required for the library backend".to_string(),
                )
            })?;
            Ok(Box::new(LibraryRuntime::new(path, config.library.symbol.clone())))
        }
        #[cfg(feature = "python")]
        ForeignBackend::Python => Ok(Box::new(PythonRuntime::new(config.python.clone()))),
        #[cfg(not(feature = "python"))]
        ForeignBackend::Python => Err(ConfigError::ValidationError(
            "the python backend requires building with the `python` feature".to_string(),
        )
        .into()),
    }
}

/// Maps a cached initialization failure into the error every caller sees.
pub(crate) fn cached_init<T>(state: &Result<T, String>) -> ForeignResult<&T> {
    state.as_ref().map_err(|reason| ForeignError::Init(reason.clone()))
}
