use tracing::trace;

use super::Drawlist;
use crate::backend::RenderBackend;
use crate::key::{KeyKind, Translucency};
use crate::operation::OperationPool;
use crate::render_state::{BlendMode, CullMode, TextureId};
use crate::stats::FrameStats;

/// State last issued to the backend during a scan
///
/// Header fields start at zero, so a first entry on layer 0 binds nothing
/// for the layer. Resource bindings start unset and are always issued for the
/// first draw.
struct ScanState {
    layer: u8,
    viewport: u8,
    viewport_layer: u8,
    translucency: Translucency,
    shader: Option<u8>,
    model: Option<u8>,
    texture: Option<u8>,
    blend: Option<BlendMode>,
    cull: Option<CullMode>,
}

impl ScanState {
    fn new() -> Self {
        Self {
            layer: 0,
            viewport: 0,
            viewport_layer: 0,
            translucency: Translucency::Opaque,
            shader: None,
            model: None,
            texture: None,
            blend: None,
            cull: None,
        }
    }
}

impl Drawlist {
    /// Sort if needed, then issue every live model entry to `backend` in key
    /// order.
    ///
    /// # Panics
    ///
    /// Panics if a live entry's handle is not in `ops`.
    pub fn render<B: RenderBackend + ?Sized>(
        &mut self,
        ops: &OperationPool,
        backend: &mut B,
    ) -> FrameStats {
        let mut stats = FrameStats {
            sorted: self.sort(),
            ..Default::default()
        };
        let mut state = ScanState::new();

        for entry in self.live_entries() {
            stats.entries_scanned += 1;
            let key = entry.key;

            if key.kind() == KeyKind::Command {
                stats.commands_skipped += 1;
                continue;
            }

            let op = &ops[entry.op];
            let layer = op.layer();

            if key.layer() != state.layer {
                backend.bind_layer(layer);
                state.layer = key.layer();
                stats.layer_binds += 1;
            }

            if key.viewport() != state.viewport || key.viewport_layer() != state.viewport_layer {
                backend.set_viewport(layer);
                state.viewport = key.viewport();
                state.viewport_layer = key.viewport_layer();
                stats.viewport_changes += 1;
            }

            if key.translucency() != state.translucency {
                backend.set_translucency(key.translucency());
                state.translucency = key.translucency();
                stats.translucency_changes += 1;
            }

            if state.shader != Some(key.shader()) {
                backend.use_program(op.program());
                state.shader = Some(key.shader());
                stats.program_binds += 1;
            }

            if state.model != Some(key.model_id()) {
                backend.bind_vertex_array(op.model().vao);
                state.model = Some(key.model_id());
                stats.vertex_array_binds += 1;
            }

            // Texture 0 means untextured; the previous binding is left alone.
            if state.texture != Some(key.texture()) {
                state.texture = Some(key.texture());
                if key.texture() != 0 {
                    backend.bind_texture(0, TextureId(key.texture() as u32));
                    stats.texture_binds += 1;
                }
            }

            let params = op.params();
            if state.blend != Some(params.blend) {
                backend.set_blend(params.blend);
                state.blend = Some(params.blend);
                stats.blend_changes += 1;
            }
            if state.cull != Some(params.cull) {
                backend.set_cull(params.cull);
                state.cull = Some(params.cull);
                stats.cull_changes += 1;
            }

            backend.set_object_params(op.program(), params);
            backend.draw_indexed(op.model().index_count);
            stats.draws += 1;
        }

        backend.end_pass();
        trace!(
            draws = stats.draws,
            state_changes = stats.state_changes(),
            skipped = stats.commands_skipped,
            "drawlist rendered"
        );
        stats
    }
}
