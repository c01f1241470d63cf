//! Bullet record
//!
//! The only value exchanged across language boundaries. Every consumer
//! (C, C++, Go, Python, QuickJS) must agree on the exact field order and
//! width, so the struct is packed and the layout is checked at compile time.

pub mod codec;
pub mod layout;

pub use codec::RecordCodec;
pub use layout::{FieldKind, FieldLayout, FIELDS, RECORD_SIZE, SCHEMA_VERSION};

use std::fmt;

use bytemuck::{Pod, Zeroable};

/// 8-bit RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Fixed-layout bullet record (25 bytes, no padding)
///
/// Fields are private: references into a packed struct are unaligned, so all
/// access goes through by-value getters and setters.
#[repr(C, packed)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Bullet {
    damage: i32,
    count: i32,
    speed: i32,
    hp: i32,
    color: Rgba,
    damage_by_frame: u8,
    mp_cost: i32,
}

const _: () = {
    assert!(std::mem::size_of::<Bullet>() == RECORD_SIZE);
    assert!(std::mem::align_of::<Bullet>() == 1);
    assert!(std::mem::offset_of!(Bullet, damage) == layout::DAMAGE.offset);
    assert!(std::mem::offset_of!(Bullet, count) == layout::COUNT.offset);
    assert!(std::mem::offset_of!(Bullet, speed) == layout::SPEED.offset);
    assert!(std::mem::offset_of!(Bullet, hp) == layout::HP.offset);
    assert!(std::mem::offset_of!(Bullet, color) == layout::COLOR.offset);
    assert!(std::mem::offset_of!(Bullet, damage_by_frame) == layout::DAMAGE_BY_FRAME.offset);
    assert!(std::mem::offset_of!(Bullet, mp_cost) == layout::MP_COST.offset);
};

impl Default for Bullet {
    /// Opaque white, one bullet of one damage at speed one, costing one mp.
    fn default() -> Self {
        Self {
            damage: 1,
            count: 1,
            speed: 1,
            hp: 0,
            color: Rgba::WHITE,
            damage_by_frame: 0,
            mp_cost: 1,
        }
    }
}

impl Bullet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn set_damage(&mut self, damage: i32) {
        self.damage = damage;
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn set_count(&mut self, count: i32) {
        self.count = count;
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp;
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    pub fn damage_by_frame(&self) -> bool {
        self.damage_by_frame != 0
    }

    pub fn set_damage_by_frame(&mut self, enabled: bool) {
        self.damage_by_frame = u8::from(enabled);
    }

    pub fn mp_cost(&self) -> i32 {
        self.mp_cost
    }

    pub fn set_mp_cost(&mut self, mp_cost: i32) {
        self.mp_cost = mp_cost;
    }

    /// Host-order view of the record, as handed to native code by pointer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Raw flag byte, for callers that need to see exactly what native code wrote.
    pub fn damage_by_frame_raw(&self) -> u8 {
        self.damage_by_frame
    }
}

impl PartialEq for Bullet {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Bullet {}

impl fmt::Debug for Bullet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bullet")
            .field("damage", &self.damage())
            .field("count", &self.count())
            .field("speed", &self.speed())
            .field("hp", &self.hp())
            .field("color", &self.color())
            .field("damage_by_frame", &self.damage_by_frame())
            .field("mp_cost", &self.mp_cost())
            .finish()
    }
}
