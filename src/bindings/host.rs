//! Process-wide factory behind the C ABI

use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::config::BridgeConfig;
use crate::core::error::BridgeResult;
use crate::core::init_logging;
use crate::factory::BulletFactory;

pub(crate) enum HostState {
    Uninitialized,
    Running(BulletFactory),
    ShutDown,
}

static HOST: OnceLock<Mutex<HostState>> = OnceLock::new();

/// Locks the host. A panic while the lock was held does not poison it for
/// later callers.
pub(crate) fn lock() -> MutexGuard<'static, HostState> {
    HOST.get_or_init(|| Mutex::new(HostState::Uninitialized))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Outcome of an explicit initialization request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InitStatus {
    Started,
    AlreadyRunning,
}

fn start(config: &BridgeConfig) -> BridgeResult<BulletFactory> {
    init_logging(&config.logging);
    let factory = BulletFactory::from_config(config)?;
    tracing::info!(
        target: "bridge.ffi",
        backend = %config.foreign.backend,
        "Bullet bridge started"
    );
    Ok(factory)
}

/// Starts the host from a config file, or from discovered config when
/// `path` is `None`.
pub(crate) fn init(path: Option<&Path>) -> BridgeResult<InitStatus> {
    let mut host = lock();
    if let HostState::Running(_) = *host {
        return Ok(InitStatus::AlreadyRunning);
    }

    let config = match path {
        Some(path) => {
            let mut config = BridgeConfig::from_file(path)?;
            config.apply_env_overrides();
            config
        }
        None => BridgeConfig::load_or_default(),
    };

    *host = HostState::Running(start(&config)?);
    Ok(InitStatus::Started)
}

/// Runs `f` against the running factory, starting it on first use.
///
/// Returns `Ok(None)` once the host has been shut down.
pub(crate) fn with_factory<T>(
    f: impl FnOnce(&mut BulletFactory) -> BridgeResult<T>,
) -> BridgeResult<Option<T>> {
    let mut host = lock();
    if let HostState::Uninitialized = *host {
        *host = HostState::Running(start(&BridgeConfig::load_or_default())?);
    }

    match &mut *host {
        HostState::Running(factory) => f(factory).map(Some),
        HostState::ShutDown => Ok(None),
        HostState::Uninitialized => Ok(None),
    }
}

/// Drops the factory and every runtime it holds. Further calls are refused.
pub(crate) fn shutdown() {
    let mut host = lock();
    if let HostState::Running(factory) = &mut *host {
        factory.shutdown();
        tracing::info!(target: "bridge.ffi", "Bullet bridge shut down");
    }
    *host = HostState::ShutDown;
}
