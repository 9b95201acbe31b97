//! Frame loop: update phase mutates the drawlist, render phase scans it
//!
//! Each frame hides and reveals a share of the objects (remove/add), every
//! few frames re-keys one object with another shader, and then renders the
//! drawlist into the backend.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::{debug, info};

use prototype_core::{Drawlist, FrameMetrics, FrameStats, KeyError, RenderBackend};

use crate::config::{Config, RunConfig};
use crate::scene::Scene;

/// Separates the churn stream from the scene-building stream.
const CHURN_STREAM: u64 = 0xC4A5_E1F0;

/// What one update phase changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub hidden: u32,
    pub shown: u32,
    pub shader_swaps: u32,
}

/// Totals over every frame stepped so far
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub draws: u64,
    pub program_binds: u64,
    pub vertex_array_binds: u64,
    pub texture_binds: u64,
    pub state_changes: u64,
    pub sorts: u64,
    pub hidden: u64,
    pub shown: u64,
    pub shader_swaps: u64,
    /// Largest live entry count seen after a render
    pub peak_live: usize,
}

impl RunSummary {
    pub fn draws_per_frame(&self) -> f64 {
        self.draws as f64 / self.frames.max(1) as f64
    }

    pub fn state_changes_per_frame(&self) -> f64 {
        self.state_changes as f64 / self.frames.max(1) as f64
    }

    fn add_frame(&mut self, update: &UpdateStats, stats: &FrameStats, live: usize) {
        self.frames += 1;
        self.draws += stats.draws as u64;
        self.program_binds += stats.program_binds as u64;
        self.vertex_array_binds += stats.vertex_array_binds as u64;
        self.texture_binds += stats.texture_binds as u64;
        self.state_changes += stats.state_changes() as u64;
        self.sorts += stats.sorted as u64;
        self.hidden += update.hidden as u64;
        self.shown += update.shown as u64;
        self.shader_swaps += update.shader_swaps as u64;
        self.peak_live = self.peak_live.max(live);
    }
}

/// Owns the drawlist, the scene and the backend for a run
pub struct FrameLoop<B: RenderBackend> {
    drawlist: Drawlist,
    scene: Scene,
    backend: B,
    rng: Pcg32,
    /// Per object, in scene handle order: currently in the drawlist
    visible: Vec<bool>,
    run: RunConfig,
    metrics: FrameMetrics,
    summary: RunSummary,
}

impl<B: RenderBackend> FrameLoop<B> {
    /// Build the scene and add every object to a fresh drawlist.
    ///
    /// `config` must have passed [`Config::validate`].
    pub fn new(config: &Config, backend: B) -> Result<Self, KeyError> {
        let scene = Scene::build(&config.scene)?;

        let mut drawlist = Drawlist::from_config(&config.drawlist);
        drawlist.clear();
        for &handle in &scene.handles {
            drawlist.add(&scene.ops, handle);
        }

        info!(
            objects = scene.handles.len(),
            capacity = drawlist.capacity(),
            "frame loop ready"
        );

        Ok(Self {
            visible: vec![true; scene.handles.len()],
            drawlist,
            scene,
            backend,
            rng: Pcg32::seed_from_u64(config.scene.seed ^ CHURN_STREAM),
            run: config.run.clone(),
            metrics: FrameMetrics::new(),
            summary: RunSummary::default(),
        })
    }

    pub fn drawlist(&self) -> &Drawlist {
        &self.drawlist
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Objects currently in the drawlist
    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|&&v| v).count()
    }

    /// One update phase followed by one render phase.
    pub fn step(&mut self) -> Result<FrameStats, KeyError> {
        let update = self.update()?;
        let stats = self.render();
        self.summary
            .add_frame(&update, &stats, self.drawlist.len());
        Ok(stats)
    }

    /// Step `frames` times and return the totals.
    pub fn run(&mut self, frames: u32) -> Result<RunSummary, KeyError> {
        for _ in 0..frames {
            self.step()?;
        }
        Ok(self.summary)
    }

    fn update(&mut self) -> Result<UpdateStats, KeyError> {
        let mut update = UpdateStats::default();
        let objects = self.scene.handles.len();
        if objects == 0 {
            return Ok(update);
        }

        let toggles = (objects as f64 * self.run.churn).round() as usize;
        let mut picked: Vec<usize> = (0..toggles)
            .map(|_| self.rng.random_range(0..objects))
            .collect();
        picked.sort_unstable();
        picked.dedup();

        // Removals first: they keep the live range from growing past the
        // object count while the reveals are appended.
        for &index in picked.iter().filter(|&&i| self.visible[i]) {
            self.drawlist.remove(&self.scene.ops, self.scene.handles[index]);
            update.hidden += 1;
        }
        for &index in picked.iter().filter(|&&i| !self.visible[i]) {
            self.drawlist.add(&self.scene.ops, self.scene.handles[index]);
            update.shown += 1;
        }
        for &index in &picked {
            self.visible[index] = !self.visible[index];
        }

        let interval = self.run.shader_swap_interval as u64;
        if interval > 0 && (self.summary.frames + 1) % interval == 0 {
            let index = self.rng.random_range(0..objects);
            if self.swap_shader(index)? {
                update.shader_swaps += 1;
            }
        }

        Ok(update)
    }

    /// Re-key one object with a different program. Returns `false` when there
    /// is only one program to choose from.
    fn swap_shader(&mut self, index: usize) -> Result<bool, KeyError> {
        let programs = &self.scene.programs;
        if programs.len() < 2 {
            return Ok(false);
        }
        let handle = self.scene.handles[index];
        let current = self.scene.ops[handle].program().id;
        let offset = self.rng.random_range(1..programs.len());
        let program = programs[(current as usize + offset) % programs.len()];

        if self.visible[index] {
            // The entry is found by its old key, so remove before re-keying.
            self.drawlist.remove(&self.scene.ops, handle);
            self.scene.swap_shader(handle, program)?;
            // Compact so the re-add cannot overflow a full list.
            self.drawlist.sort();
            self.drawlist.add(&self.scene.ops, handle);
        } else {
            self.scene.swap_shader(handle, program)?;
        }

        debug!(
            handle = handle.0,
            from = current,
            to = program.id,
            "shader swapped"
        );
        Ok(true)
    }

    fn render(&mut self) -> FrameStats {
        let stats = self.drawlist.render(&self.scene.ops, &mut self.backend);
        self.metrics.record(&stats, self.drawlist.live_entries());
        self.metrics.maybe_log();
        stats
    }

    /// Log every live entry's key, in render order.
    pub fn dump_keys(&self) {
        for (index, entry) in self.drawlist.live_entries().iter().enumerate() {
            info!("entry {} (op {}):\n{}", index, entry.op.0, entry.key);
        }
    }
}
