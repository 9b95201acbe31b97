//! Render state referenced by draw operations
//!
//! These are plain handles and enums. The GPU objects behind them (programs,
//! vertex arrays, textures, uniform buffers) are created and owned elsewhere;
//! the drawlist only reads their ids to build keys and passes them through to
//! the [`RenderBackend`](crate::RenderBackend).

use glam::Mat4;

use crate::key::Translucency;

/// Handle to a loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextureId(pub u32);

impl TextureId {
    /// No texture bound
    pub const NONE: TextureId = TextureId(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

/// Linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderProgram {
    /// Program object name, also used as the key's shader field
    pub id: u32,
}

/// GPU-resident model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Model {
    /// Small sort id, unique per model, stored in the key
    pub id: u32,
    /// Vertex array object
    pub vao: u32,
    /// Number of indices to draw
    pub index_count: u32,
    /// Texture bound to unit 0 while drawing
    pub texture: TextureId,
    pub material: u32,
}

/// Render pass grouping that shares a projection and viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Layer {
    /// Coarsest sort axis (0 = drawn first)
    pub index: u8,
    pub viewport: u8,
    pub viewport_layer: u8,
    /// Uniform buffer holding the layer's matrices
    pub ubo: u32,
}

/// Face culling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CullMode {
    #[default]
    None = 0,
    Front = 1,
    Back = 2,
}

impl CullMode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => CullMode::Front,
            2 => CullMode::Back,
            _ => CullMode::None,
        }
    }
}

/// Blend equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    None = 0,
    /// src_alpha, one_minus_src_alpha
    Alpha = 1,
    /// one, one_minus_src_alpha
    PremultipliedAlpha = 2,
    Additive = 3,
    Subtractive = 4,
}

impl BlendMode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => BlendMode::Alpha,
            2 => BlendMode::PremultipliedAlpha,
            3 => BlendMode::Additive,
            4 => BlendMode::Subtractive,
            _ => BlendMode::None,
        }
    }

    /// Sort bucket for this blend mode
    pub fn translucency(self) -> Translucency {
        match self {
            BlendMode::None => Translucency::Opaque,
            BlendMode::Alpha | BlendMode::PremultipliedAlpha => Translucency::Normal,
            BlendMode::Additive => Translucency::Additive,
            BlendMode::Subtractive => Translucency::Subtractive,
        }
    }
}

/// Per-object render parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    pub blend: BlendMode,
    pub cull: CullMode,
    pub modelview: Mat4,
    /// Camera-space distance, used as the key's depth
    pub depth: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            blend: BlendMode::None,
            cull: CullMode::None,
            modelview: Mat4::IDENTITY,
            depth: 0.0,
        }
    }
}
