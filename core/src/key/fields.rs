//! Bit layout of a [`DrawKey`](super::DrawKey)
//!
//! Every field is a named `(shift, width)` pair over a single `u64`. Fields
//! closer to the most significant bit dominate the sort order.
//!
//! ```text
//!  63   62..57   56..55  54..53    52..51       50..49     48
//! [del][reserved][layer][viewport][vp. layer][translucency][kind]
//!
//! kind = MODEL:   47..40   39..32    31..24  23..8   7..0
//!                [shader][texture][model][depth][material]
//!
//! kind = COMMAND: 47..40     39..8   7..0
//!                [sequence][ id  ][reserved]
//! ```

use super::KeyError;

/// A named run of bits inside a draw key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyField {
    pub name: &'static str,
    pub shift: u32,
    pub width: u32,
}

impl KeyField {
    const fn new(name: &'static str, shift: u32, width: u32) -> Self {
        Self { name, shift, width }
    }

    /// Largest value the field can hold.
    #[inline]
    pub const fn max(self) -> u64 {
        (1u64 << self.width) - 1
    }

    /// Field bits in place.
    #[inline]
    pub const fn mask(self) -> u64 {
        self.max() << self.shift
    }

    #[inline]
    pub const fn get(self, raw: u64) -> u64 {
        (raw >> self.shift) & self.max()
    }

    /// Replace the field in `raw`. Values wider than the field are truncated;
    /// use [`KeyField::check`] first when the value is not already known to fit.
    #[inline]
    pub const fn set(self, raw: u64, value: u64) -> u64 {
        (raw & !self.mask()) | ((value & self.max()) << self.shift)
    }

    pub fn check(self, value: u64) -> Result<u64, KeyError> {
        if value > self.max() {
            Err(KeyError::FieldOverflow {
                field: self.name,
                value,
                max: self.max(),
            })
        } else {
            Ok(value)
        }
    }
}

// Header, shared by every key variant
pub const DELETED: KeyField = KeyField::new("deleted", 63, 1);
pub const RESERVED: KeyField = KeyField::new("reserved", 57, 6);
pub const LAYER: KeyField = KeyField::new("layer", 55, 2);
pub const VIEWPORT: KeyField = KeyField::new("viewport", 53, 2);
pub const VIEWPORT_LAYER: KeyField = KeyField::new("viewport_layer", 51, 2);
pub const TRANSLUCENCY: KeyField = KeyField::new("translucency", 49, 2);
pub const KIND: KeyField = KeyField::new("kind", 48, 1);

// Model payload
pub const SHADER: KeyField = KeyField::new("shader", 40, 8);
pub const TEXTURE: KeyField = KeyField::new("texture", 32, 8);
pub const MODEL: KeyField = KeyField::new("model", 24, 8);
pub const DEPTH: KeyField = KeyField::new("depth", 8, 16);
pub const MATERIAL: KeyField = KeyField::new("material", 0, 8);

// Command payload
pub const SEQUENCE: KeyField = KeyField::new("sequence", 40, 8);
pub const COMMAND_ID: KeyField = KeyField::new("id", 8, 32);

/// Header fields, most significant first.
pub const HEADER: [KeyField; 7] = [
    DELETED,
    RESERVED,
    LAYER,
    VIEWPORT,
    VIEWPORT_LAYER,
    TRANSLUCENCY,
    KIND,
];

/// Fields that order model keys, in descending priority.
pub const MODEL_PRIORITY: [KeyField; 9] = [
    LAYER,
    VIEWPORT,
    VIEWPORT_LAYER,
    TRANSLUCENCY,
    SHADER,
    TEXTURE,
    MODEL,
    DEPTH,
    MATERIAL,
];
