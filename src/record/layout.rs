//! Wire layout of the bullet record
//!
//! The field table is the serialization contract shared by every runtime.
//! Bump [`SCHEMA_VERSION`] whenever an entry changes.

/// Version of the field table below.
pub const SCHEMA_VERSION: u16 = 1;

/// Total size of the record in bytes.
pub const RECORD_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed 32-bit integer
    I32,
    /// Four unsigned bytes: r, g, b, a
    Rgba,
    /// One byte, 0 or 1
    Flag,
}

impl FieldKind {
    pub const fn width(self) -> usize {
        match self {
            FieldKind::I32 | FieldKind::Rgba => 4,
            FieldKind::Flag => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

impl FieldLayout {
    const fn new(name: &'static str, offset: usize, kind: FieldKind) -> Self {
        Self { name, offset, kind }
    }

    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width()
    }
}

pub const DAMAGE: FieldLayout = FieldLayout::new("damage", 0, FieldKind::I32);
pub const COUNT: FieldLayout = FieldLayout::new("count", 4, FieldKind::I32);
pub const SPEED: FieldLayout = FieldLayout::new("speed", 8, FieldKind::I32);
pub const HP: FieldLayout = FieldLayout::new("hp", 12, FieldKind::I32);
pub const COLOR: FieldLayout = FieldLayout::new("color", 16, FieldKind::Rgba);
pub const DAMAGE_BY_FRAME: FieldLayout = FieldLayout::new("damage_by_frame", 20, FieldKind::Flag);
pub const MP_COST: FieldLayout = FieldLayout::new("mp_cost", 21, FieldKind::I32);

/// Fields in wire order.
pub const FIELDS: [FieldLayout; 7] = [DAMAGE, COUNT, SPEED, HP, COLOR, DAMAGE_BY_FRAME, MP_COST];

// Fields are contiguous and cover the record exactly.
const _: () = {
    let mut expected = 0;
    let mut i = 0;
    while i < FIELDS.len() {
        assert!(FIELDS[i].offset == expected);
        expected = FIELDS[i].end();
        i += 1;
    }
    assert!(expected == RECORD_SIZE);
};

/// Looks up a field by name.
pub fn field(name: &str) -> Option<&'static FieldLayout> {
    FIELDS.iter().find(|f| f.name == name)
}
