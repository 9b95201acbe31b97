//! Draw keys
//!
//! A [`DrawKey`] packs the render state of one draw operation into a `u64`
//! whose numeric order is the order the drawlist renders in. Layer, viewport
//! and translucency outrank shader, texture, model, depth and material, so
//! sorting keys ascending clusters same-shader draws and, inside those,
//! same-texture draws. See [`fields`] for the exact bit layout.

pub mod fields;


use std::fmt;

use fields::KeyField;

/// Error building a key from raw field values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Value does not fit in the field's bit width
    #[error("{field} value {value} does not fit in the draw key (max {max})")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

/// Blending class of a draw. Opaque draws sort first.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Translucency {
    #[default]
    Opaque = 0,
    Normal = 1,
    Additive = 2,
    Subtractive = 3,
}

impl Translucency {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Translucency::Opaque,
            1 => Translucency::Normal,
            2 => Translucency::Additive,
            _ => Translucency::Subtractive,
        }
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self == Translucency::Opaque
    }
}

/// Payload variant of a key
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum KeyKind {
    /// Model draw: shader, texture, model, depth, material
    #[default]
    Model = 0,
    /// Non-model command: sequence, id. Not consumed by the render scan yet.
    Command = 1,
}

/// Fields shared by every key variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyHeader {
    pub layer: u8,
    pub viewport: u8,
    pub viewport_layer: u8,
    pub translucency: Translucency,
}

impl KeyHeader {
    fn pack(&self, kind: KeyKind) -> Result<u64, KeyError> {
        let mut raw = 0;
        raw = fields::LAYER.set(raw, fields::LAYER.check(self.layer as u64)?);
        raw = fields::VIEWPORT.set(raw, fields::VIEWPORT.check(self.viewport as u64)?);
        raw = fields::VIEWPORT_LAYER.set(
            raw,
            fields::VIEWPORT_LAYER.check(self.viewport_layer as u64)?,
        );
        raw = fields::TRANSLUCENCY.set(raw, self.translucency as u64);
        raw = fields::KIND.set(raw, kind as u64);
        Ok(raw)
    }
}

/// Payload of a model key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModelFields {
    pub shader: u32,
    /// 0 means "no texture"
    pub texture: u32,
    pub model: u32,
    /// Quantized depth, see [`crate::depth`]
    pub depth: u16,
    pub material: u32,
}

/// Packed 64-bit sort key
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DrawKey(u64);

impl DrawKey {
    /// Key of an unused drawlist slot: only the deleted bit is set.
    pub const DELETED: DrawKey = DrawKey(fields::DELETED.mask());

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        DrawKey(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Build a model key. Fails if any id is wider than its field.
    pub fn model(header: KeyHeader, payload: ModelFields) -> Result<Self, KeyError> {
        let mut raw = header.pack(KeyKind::Model)?;
        raw = fields::SHADER.set(raw, fields::SHADER.check(payload.shader as u64)?);
        raw = fields::TEXTURE.set(raw, fields::TEXTURE.check(payload.texture as u64)?);
        raw = fields::MODEL.set(raw, fields::MODEL.check(payload.model as u64)?);
        raw = fields::DEPTH.set(raw, payload.depth as u64);
        raw = fields::MATERIAL.set(raw, fields::MATERIAL.check(payload.material as u64)?);
        Ok(DrawKey(raw))
    }

    /// Build a command key.
    pub fn command(header: KeyHeader, sequence: u32, id: u32) -> Result<Self, KeyError> {
        let mut raw = header.pack(KeyKind::Command)?;
        raw = fields::SEQUENCE.set(raw, fields::SEQUENCE.check(sequence as u64)?);
        raw = fields::COMMAND_ID.set(raw, id as u64);
        Ok(DrawKey(raw))
    }

    #[inline]
    fn field(self, field: KeyField) -> u64 {
        field.get(self.0)
    }

    #[inline]
    pub fn is_deleted(self) -> bool {
        self.field(fields::DELETED) != 0
    }

    #[inline]
    pub fn with_deleted(self, deleted: bool) -> Self {
        DrawKey(fields::DELETED.set(self.0, deleted as u64))
    }

    /// The key as it was before any soft delete, for searching.
    #[inline]
    pub fn without_deleted(self) -> Self {
        DrawKey(self.0 & !fields::DELETED.mask())
    }

    #[inline]
    pub fn layer(self) -> u8 {
        self.field(fields::LAYER) as u8
    }

    #[inline]
    pub fn viewport(self) -> u8 {
        self.field(fields::VIEWPORT) as u8
    }

    #[inline]
    pub fn viewport_layer(self) -> u8 {
        self.field(fields::VIEWPORT_LAYER) as u8
    }

    #[inline]
    pub fn translucency(self) -> Translucency {
        Translucency::from_u8(self.field(fields::TRANSLUCENCY) as u8)
    }

    #[inline]
    pub fn kind(self) -> KeyKind {
        if self.field(fields::KIND) == 0 {
            KeyKind::Model
        } else {
            KeyKind::Command
        }
    }

    pub fn header(self) -> KeyHeader {
        KeyHeader {
            layer: self.layer(),
            viewport: self.viewport(),
            viewport_layer: self.viewport_layer(),
            translucency: self.translucency(),
        }
    }

    #[inline]
    pub fn shader(self) -> u8 {
        self.field(fields::SHADER) as u8
    }

    #[inline]
    pub fn texture(self) -> u8 {
        self.field(fields::TEXTURE) as u8
    }

    #[inline]
    pub fn model_id(self) -> u8 {
        self.field(fields::MODEL) as u8
    }

    #[inline]
    pub fn depth(self) -> u16 {
        self.field(fields::DEPTH) as u16
    }

    #[inline]
    pub fn material(self) -> u8 {
        self.field(fields::MATERIAL) as u8
    }

    #[inline]
    pub fn sequence(self) -> u8 {
        self.field(fields::SEQUENCE) as u8
    }

    #[inline]
    pub fn command_id(self) -> u32 {
        self.field(fields::COMMAND_ID) as u32
    }
}

impl fmt::Debug for DrawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawKey({:#018x})", self.0)
    }
}

/// Multi-line field dump, one field per line.
impl fmt::Display for DrawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "header: layer={} viewport={} viewport_layer={} translucency={:?} kind={:?} deleted={}",
            self.layer(),
            self.viewport(),
            self.viewport_layer(),
            self.translucency(),
            self.kind(),
            self.is_deleted(),
        )?;
        match self.kind() {
            KeyKind::Model => writeln!(
                f,
                "model: shader={} texture={} model={} depth={} material={}",
                self.shader(),
                self.texture(),
                self.model_id(),
                self.depth(),
                self.material(),
            )?,
            KeyKind::Command => writeln!(
                f,
                "command: sequence={} id={}",
                self.sequence(),
                self.command_id(),
            )?,
        }
        write!(f, "raw: {} ({:#018X})", self.0, self.0)
    }
}
