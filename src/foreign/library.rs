//! Shared-library runtime
//!
//! Stands in for runtimes that are compiled to a C-callable library (a cgo
//! `-buildmode=c-shared` build, for instance). The library exports:
//!
//! ```c
//! ptrdiff_t bullet_transform(const uint8_t *input, size_t input_len,
//!                            uint8_t *output, size_t output_capacity);
//! ```
//!
//! returning the number of bytes written to `output`, or a negative error code.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use libloading::{Library, Symbol};

use super::{cached_init, ForeignRuntime};
use crate::core::error::{ForeignError, ForeignResult};
use crate::record::RECORD_SIZE;

type TransformFn = unsafe extern "C" fn(*const u8, usize, *mut u8, usize) -> isize;

struct Loaded {
    transform: TransformFn,
    _library: Library,
}

pub struct LibraryRuntime {
    path: PathBuf,
    symbol: String,
    loaded: OnceLock<Result<Loaded, String>>,
}

impl LibraryRuntime {
    pub fn new(path: impl Into<PathBuf>, symbol: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            symbol: symbol.into(),
            loaded: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn loaded(&self) -> ForeignResult<&Loaded> {
        cached_init(self.loaded.get_or_init(|| {
            let loaded = self.load();
            if let Err(reason) = &loaded {
                tracing::error!(target: "bridge.foreign", "Library runtime failed to load: {}", reason);
            }
            loaded
        }))
    }

    fn load(&self) -> Result<Loaded, String> {
        if !self.path.exists() {
            return Err(format!("library not found: {}", self.path.display()));
        }

        unsafe {
            let library = Library::new(&self.path)
                .map_err(|e| format!("failed to load {}: {}", self.path.display(), e))?;
            let transform = {
                let sym: Symbol<TransformFn> = library.get(self.symbol.as_bytes()).map_err(|e| {
                    format!(
                        "symbol '{}' not found in {}: {}",
                        self.symbol,
                        self.path.display(),
                        e
                    )
                })?;
                *sym
            };
            Ok(Loaded {
                transform,
                _library: library,
            })
        }
    }
}

impl ForeignRuntime for LibraryRuntime {
    fn name(&self) -> &str {
        "library"
    }

    fn initialize(&self) -> ForeignResult<()> {
        self.loaded().map(|_| ())
    }

    fn transform(&self, snapshot: &[u8]) -> ForeignResult<Vec<u8>> {
        let loaded = self.loaded()?;

        // Room for an oversized reply so that it can be reported rather than truncated.
        let mut output = vec![0u8; RECORD_SIZE * 2];
        let written = unsafe {
            (loaded.transform)(
                snapshot.as_ptr(),
                snapshot.len(),
                output.as_mut_ptr(),
                output.len(),
            )
        };

        if written < 0 {
            return Err(ForeignError::Library(format!(
                "{} returned error code {}",
                self.symbol, written
            )));
        }
        let written = written as usize;
        if written > output.len() {
            return Err(ForeignError::Library(format!(
                "{} claims {} bytes written into a {}-byte buffer",
                self.symbol,
                written,
                output.len()
            )));
        }

        output.truncate(written);
        Ok(output)
    }

    fn shutdown(&mut self) {
        self.loaded.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_is_init_error() {
        let runtime = LibraryRuntime::new("/nonexistent/libgo_ffi.so", "bullet_transform");
        let err = runtime.transform(&[0u8; RECORD_SIZE]).unwrap_err();
        assert!(matches!(err, ForeignError::Init(ref msg) if msg.contains("not found")));
        assert!(err.is_fatal());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_missing_symbol_is_init_error() {
        let libc = ["/lib/x86_64-linux-gnu/libc.so.6", "/lib64/libc.so.6", "/usr/lib/libc.so.6"]
            .into_iter()
            .map(Path::new)
            .find(|p| p.exists());
        let Some(libc) = libc else { return };

        let runtime = LibraryRuntime::new(libc, "bullet_transform");
        assert!(matches!(
            runtime.initialize(),
            Err(ForeignError::Init(ref msg)) if msg.contains("bullet_transform")
        ));
    }
}
