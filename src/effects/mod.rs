//! Effect handlers
//!
//! A tag selects one of three handler shapes:
//!
//! ```text
//!   "C"            -> Native    (mutates the record in place)
//!   "c plus plus"  -> Stacking  (in place, plus its 1-based position)
//!   "go"           -> Foreign   (byte snapshot out, byte snapshot back)
//! ```
//!
//! Which implementation sits behind each shape (built-in Rust, a symbol in a
//! shared library, or an embedded interpreter) is decided by the
//! [`EffectRegistry`].

pub mod builtin;
pub mod library;
pub mod registry;

pub use builtin::{SplitShot, StackedPower};
pub use library::{LibraryNativeEffect, LibraryStackingEffect};
pub use registry::EffectRegistry;

use std::fmt;
use std::os::raw::c_int;
use std::str::FromStr;

use crate::core::error::{EffectError, EffectResult};
use crate::foreign::ForeignHandler;
use crate::record::Bullet;

/// Wire tag of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectTag {
    C,
    CPlusPlus,
    Go,
}

impl EffectTag {
    pub const ALL: [EffectTag; 3] = [EffectTag::C, EffectTag::CPlusPlus, EffectTag::Go];

    /// Exact, case-sensitive match against the wire tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "C" => Some(EffectTag::C),
            "c plus plus" => Some(EffectTag::CPlusPlus),
            "go" => Some(EffectTag::Go),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectTag::C => "C",
            EffectTag::CPlusPlus => "c plus plus",
            EffectTag::Go => "go",
        }
    }

    /// Handler shape this tag dispatches to.
    pub fn kind(&self) -> HandlerKind {
        match self {
            EffectTag::C => HandlerKind::Native,
            EffectTag::CPlusPlus => HandlerKind::Stacking,
            EffectTag::Go => HandlerKind::Foreign,
        }
    }
}

impl fmt::Display for EffectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| format!("unknown effect tag '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Native,
    Stacking,
    Foreign,
}

/// Where in the tag sequence an effect is being applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectContext {
    /// 0-based position in the tag sequence
    pub position: usize,
}

impl EffectContext {
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    /// 1-based position handed to stacking effects, clamped to `c_int`.
    pub fn stacking(&self) -> c_int {
        c_int::try_from(self.position.saturating_add(1)).unwrap_or(c_int::MAX)
    }
}

/// Mutates a record in place
pub trait NativeEffect: Send {
    fn name(&self) -> &str;

    fn apply(&self, bullet: &mut Bullet);
}

/// Mutates a record in place, knowing its 1-based position among applied tags
pub trait StackingEffect: Send {
    fn name(&self) -> &str;

    fn apply(&self, bullet: &mut Bullet, stacking: c_int);
}

pub enum EffectHandler {
    Native(Box<dyn NativeEffect>),
    Stacking(Box<dyn StackingEffect>),
    Foreign(ForeignHandler),
}

impl EffectHandler {
    pub fn native(effect: impl NativeEffect + 'static) -> Self {
        EffectHandler::Native(Box::new(effect))
    }

    pub fn stacking(effect: impl StackingEffect + 'static) -> Self {
        EffectHandler::Stacking(Box::new(effect))
    }

    pub fn kind(&self) -> HandlerKind {
        match self {
            EffectHandler::Native(_) => HandlerKind::Native,
            EffectHandler::Stacking(_) => HandlerKind::Stacking,
            EffectHandler::Foreign(_) => HandlerKind::Foreign,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EffectHandler::Native(e) => e.name(),
            EffectHandler::Stacking(e) => e.name(),
            EffectHandler::Foreign(h) => h.runtime_name(),
        }
    }

    /// On error the record is exactly as it was before the call.
    pub fn apply(&mut self, bullet: &mut Bullet, ctx: EffectContext) -> EffectResult<()> {
        match self {
            EffectHandler::Native(effect) => {
                effect.apply(bullet);
                Ok(())
            }
            EffectHandler::Stacking(effect) => {
                effect.apply(bullet, ctx.stacking());
                Ok(())
            }
            EffectHandler::Foreign(handler) => handler.apply(bullet).map_err(EffectError::from),
        }
    }

    /// Releases runtimes and libraries held by the handler.
    pub fn shutdown(&mut self) {
        if let EffectHandler::Foreign(handler) = self {
            handler.shutdown();
        }
    }
}

impl fmt::Debug for EffectHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectHandler")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}
