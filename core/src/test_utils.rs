//! Shared test utilities for integration and unit tests

use crate::backend::RenderBackend;
use crate::key::Translucency;
use crate::operation::{DrawOperation, OpHandle, OperationPool, gen_render_key};
use crate::render_state::{
    BlendMode, CullMode, Layer, Model, RenderParams, ShaderProgram, TextureId,
};

// ============================================================================
// Recording Backend
// ============================================================================

/// One backend call, as seen by [`RecordingBackend`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendCall {
    BindLayer(u8),
    SetViewport(u8, u8),
    SetTranslucency(Translucency),
    UseProgram(u32),
    BindVertexArray(u32),
    BindTexture(u32, TextureId),
    SetBlend(BlendMode),
    SetCull(CullMode),
    SetObjectParams(u32),
    DrawIndexed(u32),
    EndPass,
}

/// Backend that records every call in order
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, matches: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }

    /// Program ids in bind order
    pub fn programs(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::UseProgram(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Index counts of every draw, in order
    pub fn draws(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::DrawIndexed(count) => Some(*count),
                _ => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn bind_layer(&mut self, layer: &Layer) {
        self.calls.push(BackendCall::BindLayer(layer.index));
    }

    fn set_viewport(&mut self, layer: &Layer) {
        self.calls
            .push(BackendCall::SetViewport(layer.viewport, layer.viewport_layer));
    }

    fn set_translucency(&mut self, translucency: Translucency) {
        self.calls.push(BackendCall::SetTranslucency(translucency));
    }

    fn use_program(&mut self, program: &ShaderProgram) {
        self.calls.push(BackendCall::UseProgram(program.id));
    }

    fn bind_vertex_array(&mut self, vao: u32) {
        self.calls.push(BackendCall::BindVertexArray(vao));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.calls.push(BackendCall::BindTexture(unit, texture));
    }

    fn set_blend(&mut self, blend: BlendMode) {
        self.calls.push(BackendCall::SetBlend(blend));
    }

    fn set_cull(&mut self, cull: CullMode) {
        self.calls.push(BackendCall::SetCull(cull));
    }

    fn set_object_params(&mut self, program: &ShaderProgram, _params: &RenderParams) {
        self.calls.push(BackendCall::SetObjectParams(program.id));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.calls.push(BackendCall::DrawIndexed(index_count));
    }

    fn end_pass(&mut self) {
        self.calls.push(BackendCall::EndPass);
    }
}

// ============================================================================
// Operation Builders
// ============================================================================

/// Describes a test operation. `index_count` doubles as a draw tag so tests
/// can tell draws apart in [`RecordingBackend::draws`].
#[derive(Debug, Clone, Copy)]
pub struct TestOp {
    pub layer: u8,
    pub shader: u32,
    pub texture: u32,
    pub model: u32,
    pub depth: f32,
    pub blend: BlendMode,
    pub cull: CullMode,
    pub index_count: u32,
}

impl Default for TestOp {
    fn default() -> Self {
        Self {
            layer: 0,
            shader: 1,
            texture: 0,
            model: 1,
            depth: 0.0,
            blend: BlendMode::None,
            cull: CullMode::None,
            index_count: 3,
        }
    }
}

impl TestOp {
    pub fn build(&self) -> DrawOperation {
        let mut op = DrawOperation::new(
            Model {
                id: self.model,
                vao: 1000 + self.model,
                index_count: self.index_count,
                texture: TextureId(self.texture),
                material: 0,
            },
            ShaderProgram { id: self.shader },
            RenderParams {
                blend: self.blend,
                cull: self.cull,
                depth: self.depth,
                ..Default::default()
            },
            Layer {
                index: self.layer,
                ubo: 500 + self.layer as u32,
                ..Default::default()
            },
        )
        .unwrap();
        gen_render_key(&mut op);
        op
    }

    /// Build, key and store the operation.
    pub fn insert(&self, pool: &mut OperationPool) -> OpHandle {
        pool.insert(self.build())
    }
}
