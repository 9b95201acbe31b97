//! Draw operations and the pool that owns them
//!
//! A [`DrawOperation`] is one request to draw a model with a shader, render
//! parameters and a layer. Operations live in a caller-owned
//! [`OperationPool`]; the drawlist only stores [`OpHandle`]s into it, so the
//! pool must outlive (and keep) every operation that is still in a drawlist.
//!
//! The key cached on an operation is **not** refreshed automatically. After
//! changing the layer, shader, model or the blend/depth parameters, remove the
//! operation from the drawlist, call [`gen_render_key`] and add it again.

use std::ops::{Index, IndexMut};

use crate::depth;
use crate::key::{DrawKey, KeyError, KeyHeader, ModelFields, fields};
use crate::render_state::{Layer, Model, RenderParams, ShaderProgram};

/// Index of an operation inside an [`OperationPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpHandle(pub u32);

impl OpHandle {
    /// Handle stored in unused drawlist slots
    pub const INVALID: OpHandle = OpHandle(u32::MAX);
}

/// A single draw request with its cached sort key
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOperation {
    key: DrawKey,
    model: Model,
    program: ShaderProgram,
    params: RenderParams,
    layer: Layer,
}

impl DrawOperation {
    /// Create an operation. Its key starts zeroed; call [`gen_render_key`]
    /// before adding it to a drawlist.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::FieldOverflow`] if any id is too wide for its key
    /// field (ids must fit so distinct resources never share a key value).
    pub fn new(
        model: Model,
        program: ShaderProgram,
        params: RenderParams,
        layer: Layer,
    ) -> Result<Self, KeyError> {
        validate_model(&model)?;
        validate_program(&program)?;
        validate_layer(&layer)?;
        Ok(Self {
            key: DrawKey::default(),
            model,
            program,
            params,
            layer,
        })
    }

    #[inline]
    pub fn key(&self) -> DrawKey {
        self.key
    }

    #[inline]
    pub fn model(&self) -> &Model {
        &self.model
    }

    #[inline]
    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    #[inline]
    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Mutable render parameters. Changing `blend` or `depth` stales the key.
    #[inline]
    pub fn params_mut(&mut self) -> &mut RenderParams {
        &mut self.params
    }

    #[inline]
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Swap the model. Stales the key.
    pub fn set_model(&mut self, model: Model) -> Result<(), KeyError> {
        validate_model(&model)?;
        self.model = model;
        Ok(())
    }

    /// Swap the shader program. Stales the key.
    pub fn set_program(&mut self, program: ShaderProgram) -> Result<(), KeyError> {
        validate_program(&program)?;
        self.program = program;
        Ok(())
    }

    /// Move to another layer. Stales the key.
    pub fn set_layer(&mut self, layer: Layer) -> Result<(), KeyError> {
        validate_layer(&layer)?;
        self.layer = layer;
        Ok(())
    }
}

fn validate_model(model: &Model) -> Result<(), KeyError> {
    fields::MODEL.check(model.id as u64)?;
    fields::TEXTURE.check(model.texture.0 as u64)?;
    fields::MATERIAL.check(model.material as u64)?;
    Ok(())
}

fn validate_program(program: &ShaderProgram) -> Result<(), KeyError> {
    fields::SHADER.check(program.id as u64)?;
    Ok(())
}

fn validate_layer(layer: &Layer) -> Result<(), KeyError> {
    fields::LAYER.check(layer.index as u64)?;
    fields::VIEWPORT.check(layer.viewport as u64)?;
    fields::VIEWPORT_LAYER.check(layer.viewport_layer as u64)?;
    Ok(())
}

/// Compute the operation's sort key, cache it on the operation and return it.
pub fn gen_render_key(op: &mut DrawOperation) -> DrawKey {
    let translucency = op.params.blend.translucency();
    let header = KeyHeader {
        layer: op.layer.index,
        viewport: op.layer.viewport,
        viewport_layer: op.layer.viewport_layer,
        translucency,
    };
    let payload = ModelFields {
        shader: op.program.id,
        texture: op.model.texture.0,
        model: op.model.id,
        depth: depth::sort_depth(op.params.depth, translucency),
        material: op.model.material,
    };
    // Every id was range-checked when it was attached to the operation.
    let key = DrawKey::model(header, payload).unwrap_or_else(|err| {
        unreachable!("draw operation holds an unchecked id: {err}")
    });
    op.key = key;
    key
}

/// Caller-owned storage for draw operations
#[derive(Debug, Default)]
pub struct OperationPool {
    ops: Vec<DrawOperation>,
}

impl OperationPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
        }
    }

    /// Store an operation and return its handle.
    pub fn insert(&mut self, op: DrawOperation) -> OpHandle {
        let handle = OpHandle(self.ops.len() as u32);
        self.ops.push(op);
        handle
    }

    pub fn get(&self, handle: OpHandle) -> Option<&DrawOperation> {
        self.ops.get(handle.0 as usize)
    }

    pub fn get_mut(&mut self, handle: OpHandle) -> Option<&mut DrawOperation> {
        self.ops.get_mut(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = OpHandle> + '_ {
        (0..self.ops.len() as u32).map(OpHandle)
    }
}

impl Index<OpHandle> for OperationPool {
    type Output = DrawOperation;

    fn index(&self, handle: OpHandle) -> &DrawOperation {
        &self.ops[handle.0 as usize]
    }
}

impl IndexMut<OpHandle> for OperationPool {
    fn index_mut(&mut self, handle: OpHandle) -> &mut DrawOperation {
        &mut self.ops[handle.0 as usize]
    }
}
