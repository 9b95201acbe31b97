//! Prototype Core - Draw keys and the sorted drawlist
//!
//! This crate turns draw requests into 64-bit sort keys and batches them so
//! that a render pass issues as few GPU state changes as possible.
//!
//! # Architecture
//!
//! - [`DrawKey`] - Packed sort key; numeric order is render order
//! - [`DrawOperation`] / [`OperationPool`] - Caller-owned draw requests
//! - [`gen_render_key`] - Computes and caches an operation's key
//! - [`Drawlist`] - Fixed-capacity entry array with lazy sort and soft delete
//! - [`RenderBackend`] - Receives the state transitions found by the scan

pub mod backend;
pub mod config;
pub mod depth;
pub mod drawlist;
#[cfg(test)]
mod integration;
pub mod key;
pub mod operation;
pub mod render_state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;

pub use backend::RenderBackend;
pub use config::DrawlistConfig;
pub use drawlist::{DEFAULT_CAPACITY, Drawlist, Entry};
pub use key::{DrawKey, KeyError, KeyHeader, KeyKind, ModelFields, Translucency};
pub use operation::{DrawOperation, OpHandle, OperationPool, gen_render_key};
pub use render_state::{
    BlendMode, CullMode, Layer, Model, RenderParams, ShaderProgram, TextureId,
};
pub use stats::{FrameMetrics, FrameStats};
