//! Prototype - headless drawlist driver
//!
//! Builds a seeded scene, keeps it in a [`Drawlist`](prototype_core::Drawlist)
//! while objects come and go, and renders each frame into a [`TraceBackend`]
//! that counts the state changes the drawlist asked for.

pub mod backend;
pub mod config;
pub mod frame;
pub mod scene;

pub use backend::TraceBackend;
pub use config::{Config, ConfigError};
pub use frame::{FrameLoop, RunSummary};
pub use scene::Scene;
