//! C ABI (FFI)
//!
//! Exposes the factory to C, C++, Go (cgo) and Python (ctypes) callers.
//! The declarations live in `include/bullet_bridge.h`.
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Callers                               │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐         │
//! │  │    C    │  │   C++   │  │   Go    │  │ Python  │         │
//! │  └────┬────┘  └────┬────┘  └────┬────┘  └────┬────┘         │
//! │       └────────────┴─────┬──────┴────────────┘              │
//! │                          v                                  │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │   create_bullet / destroy_bullet / bridge_init ...  │    │
//! │  └───────────────────────┬─────────────────────────────┘    │
//! │                          v                                  │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │   host: OnceLock<Mutex<HostState>> (one factory)    │    │
//! │  └───────────────────────┬─────────────────────────────┘    │
//! │                          v                                  │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │   BulletFactory ─▶ EffectRegistry ─▶ handlers       │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records returned by [`create_bullet`] are owned by the caller and must be
//! released with [`destroy_bullet`].

pub(crate) mod host;

use std::borrow::Cow;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::ptr;

use crate::core::error::BridgeError;
use crate::record::{Bullet, RECORD_SIZE, SCHEMA_VERSION};

/// Stand-in for a tag that cannot be read; never matches an effect.
const UNREADABLE_TAG: &str = "<unreadable>";

/// Reads up to `count` tags. Stops after the first null or non-UTF-8 tag,
/// which is kept as an unrecognized entry so the fold halts there.
unsafe fn read_tags<'a>(tags: *const *const c_char, count: usize) -> Vec<Cow<'a, str>> {
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let raw = *tags.add(i);
        let tag = if raw.is_null() {
            None
        } else {
            CStr::from_ptr(raw).to_str().ok()
        };
        match tag {
            Some(tag) => out.push(Cow::Borrowed(tag)),
            None => {
                tracing::warn!(target: "bridge.ffi", position = i, "Tag is null or not UTF-8");
                out.push(Cow::Borrowed(UNREADABLE_TAG));
                break;
            }
        }
    }
    out
}

fn fatal(err: &BridgeError) -> ! {
    tracing::error!(target: "bridge.ffi", "{}", err);
    eprintln!("bullet_bridge: {}", err);
    std::process::exit(-1);
}

/// Creates a bullet from `count` effect tags.
///
/// Returns null when `count <= 0`, when `tags` is null, after
/// [`bridge_shutdown`], or if the bridge could not start. Exits the process
/// if a foreign runtime fails to initialize.
///
/// # Safety
///
/// `tags` must point to at least `count` entries, each null or a valid
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn create_bullet(tags: *const *const c_char, count: c_int) -> *mut Bullet {
    if count <= 0 || tags.is_null() {
        return ptr::null_mut();
    }
    let count = count as usize;

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let tags = read_tags(tags, count);
        host::with_factory(|factory| factory.create(&tags, tags.len()))
    }));

    match result {
        Ok(Ok(Some(Some(bullet)))) => Box::into_raw(Box::new(bullet)),
        Ok(Ok(_)) => ptr::null_mut(),
        Ok(Err(err @ BridgeError::ForeignInit(_))) => fatal(&err),
        Ok(Err(err)) => {
            tracing::error!(target: "bridge.ffi", "create_bullet failed: {}", err);
            ptr::null_mut()
        }
        Err(_) => {
            tracing::error!(target: "bridge.ffi", "create_bullet panicked");
            ptr::null_mut()
        }
    }
}

/// Releases a record returned by [`create_bullet`]. Null is ignored.
///
/// # Safety
///
/// `bullet` must be null or a pointer from [`create_bullet`] that has not
/// been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn destroy_bullet(bullet: *mut Bullet) {
    if !bullet.is_null() {
        drop(Box::from_raw(bullet));
    }
}

#[no_mangle]
pub extern "C" fn bullet_record_size() -> usize {
    RECORD_SIZE
}

#[no_mangle]
pub extern "C" fn bullet_schema_version() -> u16 {
    SCHEMA_VERSION
}

/// Starts the bridge explicitly.
///
/// `config_path` may be null to use the discovered configuration. Returns 0
/// on success, 1 if already running, -1 on a config or startup error.
///
/// # Safety
///
/// `config_path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bridge_init(config_path: *const c_char) -> c_int {
    let path = if config_path.is_null() {
        None
    } else {
        match CStr::from_ptr(config_path).to_str() {
            Ok(path) => Some(path),
            Err(_) => {
                tracing::error!(target: "bridge.ffi", "bridge_init: config path is not UTF-8");
                return -1;
            }
        }
    };

    let result = panic::catch_unwind(|| host::init(path.map(Path::new)));
    match result {
        Ok(Ok(host::InitStatus::Started)) => 0,
        Ok(Ok(host::InitStatus::AlreadyRunning)) => 1,
        Ok(Err(err)) => {
            tracing::error!(target: "bridge.ffi", "bridge_init failed: {}", err);
            eprintln!("bullet_bridge: {}", err);
            -1
        }
        Err(_) => -1,
    }
}

/// Tears down the factory and its runtimes. Later calls to
/// [`create_bullet`] return null.
#[no_mangle]
pub extern "C" fn bridge_shutdown() {
    if panic::catch_unwind(host::shutdown).is_err() {
        tracing::error!(target: "bridge.ffi", "bridge_shutdown panicked");
    }
}
