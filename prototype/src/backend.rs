//! Headless render backend
//!
//! Logs every call at `trace` level, counts them and keeps just enough bound
//! state to catch a bind of something that is already bound.

use tracing::trace;

use prototype_core::{
    BlendMode, CullMode, Layer, RenderBackend, RenderParams, ShaderProgram, TextureId,
    Translucency,
};

/// Calls received, by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub layer_binds: u64,
    pub viewport_changes: u64,
    pub translucency_changes: u64,
    pub program_binds: u64,
    pub vertex_array_binds: u64,
    pub texture_binds: u64,
    pub blend_changes: u64,
    pub cull_changes: u64,
    pub object_params: u64,
    pub draws: u64,
    pub indices: u64,
    pub passes: u64,
}

/// Backend that records instead of rendering
#[derive(Debug, Default)]
pub struct TraceBackend {
    pub counts: CallCounts,
    /// Binds of the program or vertex array that was already bound
    pub redundant_binds: u64,
    bound_program: Option<u32>,
    bound_vao: Option<u32>,
}

impl TraceBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderBackend for TraceBackend {
    fn bind_layer(&mut self, layer: &Layer) {
        trace!(layer = layer.index, ubo = layer.ubo, "bind layer");
        self.counts.layer_binds += 1;
    }

    fn set_viewport(&mut self, layer: &Layer) {
        trace!(
            viewport = layer.viewport,
            viewport_layer = layer.viewport_layer,
            "set viewport"
        );
        self.counts.viewport_changes += 1;
    }

    fn set_translucency(&mut self, translucency: Translucency) {
        trace!(?translucency, "set translucency");
        self.counts.translucency_changes += 1;
    }

    fn use_program(&mut self, program: &ShaderProgram) {
        trace!(program = program.id, "use program");
        if self.bound_program == Some(program.id) {
            self.redundant_binds += 1;
        }
        self.bound_program = Some(program.id);
        self.counts.program_binds += 1;
    }

    fn bind_vertex_array(&mut self, vao: u32) {
        trace!(vao, "bind vertex array");
        if self.bound_vao == Some(vao) {
            self.redundant_binds += 1;
        }
        self.bound_vao = Some(vao);
        self.counts.vertex_array_binds += 1;
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        trace!(unit, texture = texture.0, "bind texture");
        self.counts.texture_binds += 1;
    }

    fn set_blend(&mut self, blend: BlendMode) {
        trace!(?blend, "set blend");
        self.counts.blend_changes += 1;
    }

    fn set_cull(&mut self, cull: CullMode) {
        trace!(?cull, "set cull");
        self.counts.cull_changes += 1;
    }

    fn set_object_params(&mut self, _program: &ShaderProgram, _params: &RenderParams) {
        self.counts.object_params += 1;
    }

    fn draw_indexed(&mut self, index_count: u32) {
        trace!(index_count, "draw");
        self.counts.draws += 1;
        self.counts.indices += index_count as u64;
    }

    fn end_pass(&mut self) {
        self.bound_program = None;
        self.bound_vao = None;
        self.counts.passes += 1;
    }
}
