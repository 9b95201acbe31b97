//! Deterministic demo scene
//!
//! A seeded scene of models scattered around a fixed camera, split between a
//! 3D scene layer and a 2D overlay layer. Every object gets a keyed
//! [`DrawOperation`] in the scene's [`OperationPool`].

use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::debug;

use prototype_core::{
    BlendMode, CullMode, DrawOperation, KeyError, Layer, Model, OpHandle, OperationPool,
    RenderParams, ShaderProgram, TextureId, gen_render_key,
};

use crate::config::SceneConfig;

/// Objects are placed inside a cube of this half-extent around the origin.
const WORLD_EXTENT: f32 = 50.0;
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 10.0, 80.0);

/// 3D world layer
pub const SCENE_LAYER: Layer = Layer {
    index: 0,
    viewport: 0,
    viewport_layer: 0,
    ubo: 1,
};

/// Screen-space overlay, drawn after the scene
pub const OVERLAY_LAYER: Layer = Layer {
    index: 1,
    viewport: 0,
    viewport_layer: 1,
    ubo: 2,
};

/// Generated scene and the operations that draw it
#[derive(Debug)]
pub struct Scene {
    pub ops: OperationPool,
    /// One handle per object, in creation order
    pub handles: Vec<OpHandle>,
    pub programs: Vec<ShaderProgram>,
    pub models: Vec<Model>,
    pub camera: Vec3,
}

impl Scene {
    /// Build the scene described by `config`.
    ///
    /// # Errors
    ///
    /// Fails if the configured counts produce ids too wide for the draw key.
    pub fn build(config: &SceneConfig) -> Result<Self, KeyError> {
        let mut rng = Pcg32::seed_from_u64(config.seed);

        let programs: Vec<ShaderProgram> =
            (0..config.shaders).map(|id| ShaderProgram { id }).collect();
        let models: Vec<Model> = (0..config.models)
            .map(|id| make_model(id, config.textures, &mut rng))
            .collect();

        let camera = CAMERA_POSITION;
        let view = Mat4::look_at_rh(camera, Vec3::ZERO, Vec3::Y);

        let mut ops = OperationPool::with_capacity(config.objects as usize);
        let mut handles = Vec::with_capacity(config.objects as usize);
        for _ in 0..config.objects {
            let overlay = rng.random_bool(config.overlay_fraction);
            let translucent = rng.random_bool(config.translucent_fraction);
            let program = programs[rng.random_range(0..programs.len())];
            let model = models[rng.random_range(0..models.len())];

            let position = Vec3::new(
                rng.random_range(-WORLD_EXTENT..=WORLD_EXTENT),
                rng.random_range(-WORLD_EXTENT..=WORLD_EXTENT),
                rng.random_range(-WORLD_EXTENT..=WORLD_EXTENT),
            );
            let (layer, depth, modelview) = if overlay {
                // Overlay quads are flat; order them by their on-screen z.
                let z = rng.random_range(0.0..1.0f32);
                (OVERLAY_LAYER, z, Mat4::from_translation(position.with_z(z)))
            } else {
                (
                    SCENE_LAYER,
                    camera.distance(position),
                    view * Mat4::from_translation(position),
                )
            };

            let params = if translucent {
                RenderParams {
                    blend: if rng.random_bool(0.5) {
                        BlendMode::Alpha
                    } else {
                        BlendMode::Additive
                    },
                    cull: CullMode::None,
                    modelview,
                    depth,
                }
            } else {
                RenderParams {
                    blend: BlendMode::None,
                    cull: CullMode::Back,
                    modelview,
                    depth,
                }
            };

            let mut op = DrawOperation::new(model, program, params, layer)?;
            gen_render_key(&mut op);
            handles.push(ops.insert(op));
        }

        debug!(
            objects = handles.len(),
            shaders = programs.len(),
            models = models.len(),
            seed = config.seed,
            "scene built"
        );

        Ok(Self {
            ops,
            handles,
            programs,
            models,
            camera,
        })
    }

    /// Give `handle` another shader program and regenerate its key.
    ///
    /// The caller must remove the operation from any drawlist first and add it
    /// back afterwards.
    pub fn swap_shader(&mut self, handle: OpHandle, program: ShaderProgram) -> Result<(), KeyError> {
        let op = &mut self.ops[handle];
        op.set_program(program)?;
        gen_render_key(op);
        Ok(())
    }
}

/// Every fourth model is untextured.
fn make_model(id: u32, textures: u32, rng: &mut Pcg32) -> Model {
    let texture = if textures == 0 || id % 4 == 3 {
        TextureId::NONE
    } else {
        TextureId(rng.random_range(1..=textures))
    };
    Model {
        id,
        vao: 100 + id,
        index_count: 3 * rng.random_range(4..=512),
        texture,
        material: rng.random_range(0..4),
    }
}
