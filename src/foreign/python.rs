//! Embedded CPython runtime using pyo3
//!
//! The interpreter itself is process-wide and is never finalized; this
//! runtime only owns the imported entry function.

use std::sync::OnceLock;

use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyBytesMethods};

use super::{cached_init, ForeignRuntime};
use crate::config::PythonConfig;
use crate::core::error::{ForeignError, ForeignResult};

pub struct PythonRuntime {
    config: PythonConfig,
    function: OnceLock<Result<Py<PyAny>, String>>,
}

impl PythonRuntime {
    pub fn new(config: PythonConfig) -> Self {
        Self {
            config,
            function: OnceLock::new(),
        }
    }

    fn function(&self) -> ForeignResult<&Py<PyAny>> {
        cached_init(self.function.get_or_init(|| {
            let function = self.import();
            match &function {
                Ok(_) => tracing::info!(
                    target: "bridge.foreign",
                    "Python entry ready: {}.{}",
                    self.config.module,
                    self.config.function
                ),
                Err(reason) => tracing::error!(
                    target: "bridge.foreign",
                    "Python runtime failed to initialize: {}",
                    reason
                ),
            }
            function
        }))
    }

    fn import(&self) -> Result<Py<PyAny>, String> {
        Python::with_gil(|py| {
            let imported = (|| -> PyResult<Py<PyAny>> {
                let search_path = self.config.search_path.to_string_lossy().into_owned();
                let sys_path = py.import_bound("sys")?.getattr("path")?;
                // re-initialization after shutdown must not grow sys.path
                if !sys_path.contains(search_path.as_str())? {
                    sys_path.call_method1("append", (search_path,))?;
                }

                let module = py.import_bound(self.config.module.as_str())?;
                let function = module.getattr(self.config.function.as_str())?;
                Ok(function.unbind())
            })();

            imported.map_err(|e| {
                e.print(py);
                format!(
                    "{}.{} (search path {}): {}",
                    self.config.module,
                    self.config.function,
                    self.config.search_path.display(),
                    e
                )
            })
        })
    }
}

impl ForeignRuntime for PythonRuntime {
    fn name(&self) -> &str {
        "cpython"
    }

    fn initialize(&self) -> ForeignResult<()> {
        self.function().map(|_| ())
    }

    fn transform(&self, snapshot: &[u8]) -> ForeignResult<Vec<u8>> {
        let function = self.function()?;

        Python::with_gil(|py| -> PyResult<Vec<u8>> {
            let result = function
                .bind(py)
                .call1((PyBytes::new_bound(py, snapshot),))?;
            let bytes = result.downcast::<PyBytes>()?;
            Ok(bytes.as_bytes().to_vec())
        })
        .map_err(|e| ForeignError::Runtime(format!("{}: {}", self.config.function, e)))
    }

    fn shutdown(&mut self) {
        self.function.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Bullet, RecordCodec};
    use std::path::PathBuf;

    fn bundled() -> PythonRuntime {
        PythonRuntime::new(PythonConfig {
            search_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scripts"),
            ..Default::default()
        })
    }

    #[test]
    fn test_bundled_module_slows_and_flags() {
        let runtime = bundled();
        let mut b = Bullet::default();
        b.set_speed(8);

        let out = runtime.transform(&RecordCodec::encode(&b)).unwrap();
        let out = RecordCodec::decode(&out).unwrap();
        assert_eq!(out.speed(), 6);
        assert!(out.damage_by_frame());
        assert_eq!(out.mp_cost(), 1);
    }

    #[test]
    fn test_reinit_does_not_grow_sys_path() {
        let mut runtime = bundled();
        runtime.initialize().unwrap();
        runtime.shutdown();
        runtime.initialize().unwrap();

        let wanted = runtime.config.search_path.to_string_lossy().into_owned();
        let entries: Vec<String> = Python::with_gil(|py| {
            py.import_bound("sys")
                .unwrap()
                .getattr("path")
                .unwrap()
                .extract()
                .unwrap()
        });
        assert_eq!(entries.iter().filter(|p| **p == wanted).count(), 1);
    }

    #[test]
    fn test_missing_module_is_init_error() {
        let runtime = PythonRuntime::new(PythonConfig {
            module: "bullet_bridge_no_such_module".to_string(),
            ..Default::default()
        });
        assert!(matches!(runtime.initialize(), Err(ForeignError::Init(_))));
        assert!(matches!(
            runtime.transform(&[0u8; 25]),
            Err(ForeignError::Init(_))
        ));
    }
}
