//! Render backend seam
//!
//! The drawlist never talks to a graphics API directly. Each state transition
//! found during the render scan becomes one call on a [`RenderBackend`], so a
//! GL, wgpu or recording implementation can sit behind it.

use crate::key::Translucency;
use crate::render_state::{BlendMode, CullMode, Layer, RenderParams, ShaderProgram, TextureId};

/// Target of the drawlist's render scan
///
/// Calls arrive in sorted key order and only when the relevant state changed
/// since the previous draw.
pub trait RenderBackend {
    /// Bind the layer's uniform buffer (projection and view matrices).
    fn bind_layer(&mut self, layer: &Layer);

    /// Viewport or viewport layer changed.
    fn set_viewport(&mut self, _layer: &Layer) {}

    /// Translucency class changed. Blend state itself arrives via [`set_blend`].
    ///
    /// [`set_blend`]: RenderBackend::set_blend
    fn set_translucency(&mut self, _translucency: Translucency) {}

    /// Make `program` the active shader program.
    fn use_program(&mut self, program: &ShaderProgram);

    /// Bind a model's vertex array.
    fn bind_vertex_array(&mut self, vao: u32);

    /// Bind a texture to a texture unit. Never called with [`TextureId::NONE`].
    fn bind_texture(&mut self, unit: u32, texture: TextureId);

    fn set_blend(&mut self, blend: BlendMode);

    fn set_cull(&mut self, cull: CullMode);

    /// Upload per-object uniforms (modelview) for the next draw.
    fn set_object_params(&mut self, program: &ShaderProgram, params: &RenderParams);

    /// Issue an indexed draw with the currently bound state.
    fn draw_indexed(&mut self, index_count: u32);

    /// Scan finished. Unbind the vertex array and program.
    fn end_pass(&mut self) {}
}
