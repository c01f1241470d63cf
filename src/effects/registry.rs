//! 效果注册表
//!
//! 管理标签到处理器的绑定。

use std::collections::HashMap;

use super::{
    EffectHandler, EffectTag, LibraryNativeEffect, LibraryStackingEffect, SplitShot,
    StackedPower,
};
use crate::config::{BridgeConfig, NativeBinding};
use crate::core::error::BridgeResult;
use crate::foreign::{self, ForeignHandler};

#[derive(Debug, Default)]
pub struct EffectRegistry {
    handlers: HashMap<EffectTag, EffectHandler>,
}

impl EffectRegistry {
    /// 空注册表：任何标签都会终止效果链
    pub fn new() -> Self {
        Self::default()
    }

    /// 默认绑定：内置原生效果 + 内置 QuickJS 脚本
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(EffectTag::C, EffectHandler::native(SplitShot));
        registry.insert(EffectTag::CPlusPlus, EffectHandler::stacking(StackedPower));
        registry.insert(
            EffectTag::Go,
            EffectHandler::Foreign(ForeignHandler::new(foreign::ScriptRuntime::bundled())),
        );
        registry
    }

    /// 按配置构建，原生库在此处立即加载，外部运行时延迟到首次调用
    pub fn from_config(config: &BridgeConfig) -> BridgeResult<Self> {
        config.validate()?;

        let mut registry = Self::new();
        registry.insert(EffectTag::C, native_handler(&config.native.c)?);
        registry.insert(EffectTag::CPlusPlus, stacking_handler(&config.native.cpp)?);
        registry.insert(
            EffectTag::Go,
            EffectHandler::Foreign(ForeignHandler::from_boxed(foreign::runtime_from_config(
                &config.foreign,
            )?)),
        );
        Ok(registry)
    }

    /// 绑定处理器，返回被替换的旧处理器
    ///
    /// 处理器形状必须与标签一致，否则拒绝绑定并原样返回。
    pub fn bind(&mut self, tag: EffectTag, handler: EffectHandler) -> Result<Option<EffectHandler>, EffectHandler> {
        if handler.kind() != tag.kind() {
            tracing::warn!(
                target: "bridge.effects",
                "Refusing to bind {:?} handler '{}' to tag '{}'",
                handler.kind(),
                handler.name(),
                tag
            );
            return Err(handler);
        }
        tracing::debug!(target: "bridge.effects", "Bound '{}' -> {}", tag, handler.name());
        Ok(self.handlers.insert(tag, handler))
    }

    fn insert(&mut self, tag: EffectTag, handler: EffectHandler) {
        debug_assert_eq!(handler.kind(), tag.kind());
        self.handlers.insert(tag, handler);
    }

    pub fn unbind(&mut self, tag: EffectTag) -> Option<EffectHandler> {
        self.handlers.remove(&tag)
    }

    pub fn get(&self, tag: EffectTag) -> Option<&EffectHandler> {
        self.handlers.get(&tag)
    }

    pub fn get_mut(&mut self, tag: EffectTag) -> Option<&mut EffectHandler> {
        self.handlers.get_mut(&tag)
    }

    pub fn is_bound(&self, tag: EffectTag) -> bool {
        self.handlers.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 关闭所有处理器持有的运行时
    pub fn shutdown(&mut self) {
        for handler in self.handlers.values_mut() {
            handler.shutdown();
        }
    }
}

fn native_handler(binding: &NativeBinding) -> BridgeResult<EffectHandler> {
    match &binding.library {
        None => Ok(EffectHandler::native(SplitShot)),
        Some(path) => Ok(EffectHandler::native(LibraryNativeEffect::load(
            path,
            &binding.symbol,
        )?)),
    }
}

fn stacking_handler(binding: &NativeBinding) -> BridgeResult<EffectHandler> {
    match &binding.library {
        None => Ok(EffectHandler::stacking(StackedPower)),
        Some(path) => Ok(EffectHandler::stacking(LibraryStackingEffect::load(
            path,
            &binding.symbol,
        )?)),
    }
}
