//! Built-in native effects, used when no shared library is configured

use std::os::raw::c_int;

use super::{NativeEffect, StackingEffect};
use crate::record::Bullet;

/// "C": doubles the bullet count for one extra mp.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitShot;

impl NativeEffect for SplitShot {
    fn name(&self) -> &str {
        "split_shot"
    }

    fn apply(&self, bullet: &mut Bullet) {
        bullet.set_count(bullet.count().saturating_mul(2));
        bullet.set_mp_cost(bullet.mp_cost().saturating_add(1));
    }
}

/// "c plus plus": adds its stacking index to damage and mp cost, so later
/// casts in a chain hit harder and cost more.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackedPower;

impl StackingEffect for StackedPower {
    fn name(&self) -> &str {
        "stacked_power"
    }

    fn apply(&self, bullet: &mut Bullet, stacking: c_int) {
        bullet.set_damage(bullet.damage().saturating_add(stacking));
        bullet.set_mp_cost(bullet.mp_cost().saturating_add(stacking));
    }
}
