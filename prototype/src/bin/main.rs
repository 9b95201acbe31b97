//! Prototype - Headless drawlist driver
//!
//! # Usage
//!
//! ```bash
//! prototype
//! prototype --frames 600 --objects 4000 --seed 7
//! prototype --config scene.toml --dump-keys
//! RUST_LOG=prototype_core=trace prototype --frames 1 --objects 8
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use prototype::{FrameLoop, TraceBackend, config};

#[derive(Parser)]
#[command(name = "prototype")]
#[command(
    author,
    version,
    about = "Headless drawlist driver - sorts, batches and counts draw calls"
)]
struct Args {
    /// Config file to use instead of the one in the config directory
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Frames to simulate
    #[arg(long, short = 'f')]
    frames: Option<u32>,

    /// Number of objects in the scene
    #[arg(long, short = 'n')]
    objects: Option<u32>,

    /// Scene RNG seed
    #[arg(long, short = 's')]
    seed: Option<u64>,

    /// Drawlist capacity
    #[arg(long)]
    capacity: Option<usize>,

    /// Log every live draw key after the first frame
    #[arg(long)]
    dump_keys: bool,

    /// Save the effective configuration to the config directory
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => config::load(),
    };
    if let Some(frames) = args.frames {
        config.run.frames = frames;
    }
    if let Some(objects) = args.objects {
        config.scene.objects = objects;
    }
    if let Some(seed) = args.seed {
        config.scene.seed = seed;
    }
    if let Some(capacity) = args.capacity {
        config.drawlist.capacity = capacity;
    }
    config.validate().context("invalid configuration")?;

    if args.write_config {
        match config::save(&config).context("saving config")? {
            Some(path) => info!("Wrote config to {}", path.display()),
            None => info!("No config directory available, config not saved"),
        }
    }

    let mut frame_loop =
        FrameLoop::new(&config, TraceBackend::new()).context("building scene")?;

    let mut remaining = config.run.frames;
    if args.dump_keys && remaining > 0 {
        frame_loop.step().context("first frame")?;
        frame_loop.dump_keys();
        remaining -= 1;
    }
    let summary = frame_loop.run(remaining).context("running frames")?;
    let backend = frame_loop.backend();

    info!(
        "{} frames: {:.1} draws/frame, {:.1} state changes/frame, {} sorts",
        summary.frames,
        summary.draws_per_frame(),
        summary.state_changes_per_frame(),
        summary.sorts
    );
    info!(
        "binds: {} program, {} vertex array, {} texture; {} redundant",
        summary.program_binds,
        summary.vertex_array_binds,
        summary.texture_binds,
        backend.redundant_binds
    );
    info!(
        "churn: {} hidden, {} shown, {} shader swaps, peak live {}",
        summary.hidden, summary.shown, summary.shader_swaps, summary.peak_live
    );

    Ok(())
}
