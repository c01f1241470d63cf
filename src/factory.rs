//! Bullet factory
//!
//! Builds a default record and folds the tag sequence over it:
//!
//! ```text
//!  Bullet::default()
//!      │  tags[0]  ──▶ handler ──▶ Bullet'
//!      │  tags[1]  ──▶ handler ──▶ Bullet''
//!      │  ...
//!      ▼  first unknown tag or failed handler ends the fold
//!  ForgeOutcome { bullet, applied, halt }
//! ```
//!
//! An unknown tag stops the fold without an error. Tags after it are never
//! looked at, even if they are valid; the caller only learns about it from
//! [`ForgeOutcome::halt`] and a `warn` log line.

use std::fmt;

use crate::config::BridgeConfig;
use crate::core::error::{BridgeError, BridgeResult};
use crate::effects::{EffectContext, EffectRegistry, EffectTag};
use crate::record::Bullet;

/// Why a fold stopped before the end of the tag sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// Tag does not name any effect
    UnknownTag { position: usize, tag: String },
    /// Tag is valid but the registry has no handler for it
    Unbound { position: usize, tag: EffectTag },
    /// Handler failed; the record keeps the effects applied before it
    HandlerFailed {
        position: usize,
        tag: EffectTag,
        reason: String,
    },
}

impl Halt {
    pub fn position(&self) -> usize {
        match self {
            Halt::UnknownTag { position, .. }
            | Halt::Unbound { position, .. }
            | Halt::HandlerFailed { position, .. } => *position,
        }
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::UnknownTag { position, tag } => {
                write!(f, "unknown tag '{}' at position {}", tag, position)
            }
            Halt::Unbound { position, tag } => {
                write!(f, "no handler bound for '{}' at position {}", tag, position)
            }
            Halt::HandlerFailed {
                position,
                tag,
                reason,
            } => write!(f, "'{}' at position {} failed: {}", tag, position, reason),
        }
    }
}

/// Result of one fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeOutcome {
    pub bullet: Bullet,
    /// Tags whose effect was applied, in order
    pub applied: Vec<EffectTag>,
    pub halt: Option<Halt>,
}

impl ForgeOutcome {
    pub fn is_complete(&self) -> bool {
        self.halt.is_none()
    }
}

#[derive(Debug)]
pub struct BulletFactory {
    registry: EffectRegistry,
}

impl BulletFactory {
    pub fn new(registry: EffectRegistry) -> Self {
        Self { registry }
    }

    /// Factory with the built-in effects and the bundled script
    pub fn builtin() -> Self {
        Self::new(EffectRegistry::builtin())
    }

    pub fn from_config(config: &BridgeConfig) -> BridgeResult<Self> {
        Ok(Self::new(EffectRegistry::from_config(config)?))
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EffectRegistry {
        &mut self.registry
    }

    /// Creates a record from the first `count` tags.
    ///
    /// `Ok(None)` when `count` is zero. Only a foreign runtime that cannot
    /// start is reported as an error; every other problem ends the fold
    /// early and still returns the record.
    pub fn create<S: AsRef<str>>(&mut self, tags: &[S], count: usize) -> BridgeResult<Option<Bullet>> {
        Ok(self.forge(tags, count)?.map(|outcome| outcome.bullet))
    }

    /// Same as [`create`](Self::create), also reporting what was applied and why the fold stopped.
    pub fn forge<S: AsRef<str>>(&mut self, tags: &[S], count: usize) -> BridgeResult<Option<ForgeOutcome>> {
        if count == 0 {
            tracing::debug!(target: "bridge.factory", "Empty request, no bullet created");
            return Ok(None);
        }

        let mut bullet = Bullet::default();
        let mut applied = Vec::new();
        let mut halt = None;

        tracing::debug!(
            target: "bridge.factory",
            requested = count,
            available = tags.len(),
            "Creating bullet"
        );

        for (position, raw) in tags.iter().take(count).enumerate() {
            let raw = raw.as_ref();

            let Some(tag) = EffectTag::from_tag(raw) else {
                tracing::warn!(
                    target: "bridge.factory",
                    position,
                    tag = raw,
                    "Unknown effect tag, remaining tags ignored"
                );
                halt = Some(Halt::UnknownTag {
                    position,
                    tag: raw.to_string(),
                });
                break;
            };

            let Some(handler) = self.registry.get_mut(tag) else {
                tracing::warn!(target: "bridge.factory", position, %tag, "No handler bound");
                halt = Some(Halt::Unbound { position, tag });
                break;
            };

            let hp_before = bullet.hp();
            match handler.apply(&mut bullet, EffectContext::new(position)) {
                Ok(()) => {
                    tracing::debug!(
                        target: "bridge.factory",
                        position,
                        %tag,
                        handler = handler.name(),
                        hp_before,
                        hp_after = bullet.hp(),
                        "Effect applied"
                    );
                    applied.push(tag);
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!(target: "bridge.factory", position, %tag, "{}", e);
                    return Err(BridgeError::from(e));
                }
                Err(e) => {
                    tracing::error!(
                        target: "bridge.factory",
                        position,
                        %tag,
                        "Effect failed, remaining tags ignored: {}",
                        e
                    );
                    halt = Some(Halt::HandlerFailed {
                        position,
                        tag,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }

        Ok(Some(ForgeOutcome {
            bullet,
            applied,
            halt,
        }))
    }

    /// Releases every runtime held by the registry
    pub fn shutdown(&mut self) {
        tracing::info!(target: "bridge.factory", "Shutting down bullet factory");
        self.registry.shutdown();
    }
}

impl Default for BulletFactory {
    fn default() -> Self {
        Self::builtin()
    }
}
