//! 从动态库加载原生效果
//!
//! 约定：
//! - "C" 效果导出 `void c_create_bullet(Bullet *bullet)`
//! - "c plus plus" 效果导出 `void cpp_create_bullet(Bullet *bullet, int stacking)`
//!
//! `Bullet` 必须按 `#pragma pack(1)` 声明，见 `include/bullet_bridge.h`。

use std::os::raw::c_int;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use super::{NativeEffect, StackingEffect};
use crate::core::error::{EffectError, EffectResult};
use crate::record::Bullet;

type NativeFn = unsafe extern "C" fn(*mut Bullet);
type StackingFn = unsafe extern "C" fn(*mut Bullet, c_int);

/// 加载动态库并解析符号
///
/// 返回的函数指针只在 `Library` 存活期间有效，调用方必须一起保存。
fn load_symbol<F: Copy>(path: &Path, symbol: &str) -> EffectResult<(Library, F)> {
    if !path.exists() {
        return Err(EffectError::Library(format!(
            "library not found: {}",
            path.display()
        )));
    }

    unsafe {
        let library = Library::new(path).map_err(|e| {
            EffectError::Library(format!("failed to load {}: {}", path.display(), e))
        })?;

        let func = {
            let sym: Symbol<F> = library.get(symbol.as_bytes()).map_err(|e| {
                EffectError::Library(format!(
                    "symbol '{}' not found in {}: {}",
                    symbol,
                    path.display(),
                    e
                ))
            })?;
            *sym
        };

        tracing::debug!(target: "bridge.effects", "Loaded {} from {}", symbol, path.display());
        Ok((library, func))
    }
}

/// 动态库中的原生效果
pub struct LibraryNativeEffect {
    name: String,
    path: PathBuf,
    func: NativeFn,
    _library: Library,
}

impl LibraryNativeEffect {
    pub fn load(path: impl AsRef<Path>, symbol: &str) -> EffectResult<Self> {
        let path = path.as_ref();
        let (library, func) = load_symbol::<NativeFn>(path, symbol)?;
        Ok(Self {
            name: symbol.to_string(),
            path: path.to_path_buf(),
            func,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NativeEffect for LibraryNativeEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, bullet: &mut Bullet) {
        // 库在 self 中保持加载，Bullet 布局与 C 侧一致
        unsafe { (self.func)(bullet as *mut Bullet) }
    }
}

/// 动态库中的叠加效果
pub struct LibraryStackingEffect {
    name: String,
    path: PathBuf,
    func: StackingFn,
    _library: Library,
}

impl LibraryStackingEffect {
    pub fn load(path: impl AsRef<Path>, symbol: &str) -> EffectResult<Self> {
        let path = path.as_ref();
        let (library, func) = load_symbol::<StackingFn>(path, symbol)?;
        Ok(Self {
            name: symbol.to_string(),
            path: path.to_path_buf(),
            func,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StackingEffect for LibraryStackingEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, bullet: &mut Bullet, stacking: c_int) {
        unsafe { (self.func)(bullet as *mut Bullet, stacking) }
    }
}
