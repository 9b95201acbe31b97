//! Render scan counters and periodic metrics logging

use std::time::{Duration, Instant};

use hashbrown::HashSet;
use tracing::debug;

use crate::drawlist::Entry;
use crate::key::KeyKind;

/// What one render scan did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Live entries walked
    pub entries_scanned: u32,
    pub draws: u32,
    pub layer_binds: u32,
    pub viewport_changes: u32,
    pub translucency_changes: u32,
    pub program_binds: u32,
    pub vertex_array_binds: u32,
    pub texture_binds: u32,
    pub blend_changes: u32,
    pub cull_changes: u32,
    /// Command entries passed over by the scan
    pub commands_skipped: u32,
    /// The scan had to sort first
    pub sorted: bool,
}

impl FrameStats {
    /// All state changes issued, excluding draws
    pub fn state_changes(&self) -> u32 {
        self.layer_binds
            + self.viewport_changes
            + self.translucency_changes
            + self.program_binds
            + self.vertex_array_binds
            + self.texture_binds
            + self.blend_changes
            + self.cull_changes
    }
}

/// Interval between metric logs
pub const LOG_INTERVAL: Duration = Duration::from_secs(1);

/// Accumulates [`FrameStats`] and logs a summary once per [`LOG_INTERVAL`]
#[derive(Debug, Clone)]
pub struct FrameMetrics {
    /// Frames rendered this interval
    pub frames: u64,
    pub draws: u64,
    pub program_binds: u64,
    pub texture_binds: u64,
    pub state_changes: u64,
    /// Frames that needed a sort
    pub sorts: u64,
    /// Most distinct (shader, texture) pairs seen in one frame
    pub peak_unique_states: usize,
    last_log_time: Instant,
    /// Reused across frames to avoid reallocating
    state_scratch: HashSet<(u8, u8)>,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            frames: 0,
            draws: 0,
            program_binds: 0,
            texture_binds: 0,
            state_changes: 0,
            sorts: 0,
            peak_unique_states: 0,
            last_log_time: Instant::now(),
            state_scratch: HashSet::new(),
        }
    }

    /// Add one frame. `entries` is the sorted live range the frame drew from.
    ///
    /// Returns the number of distinct (shader, texture) pairs in `entries`,
    /// the lower bound for program plus texture binds.
    pub fn record(&mut self, stats: &FrameStats, entries: &[Entry]) -> usize {
        self.frames += 1;
        self.draws += stats.draws as u64;
        self.program_binds += stats.program_binds as u64;
        self.texture_binds += stats.texture_binds as u64;
        self.state_changes += stats.state_changes() as u64;
        self.sorts += stats.sorted as u64;

        self.state_scratch.clear();
        self.state_scratch.extend(
            entries
                .iter()
                .filter(|e| !e.is_deleted() && e.key.kind() == KeyKind::Model)
                .map(|e| (e.key.shader(), e.key.texture())),
        );
        let unique = self.state_scratch.len();
        self.peak_unique_states = self.peak_unique_states.max(unique);
        unique
    }

    /// Log and reset if a full interval has passed.
    pub fn maybe_log(&mut self) -> bool {
        self.maybe_log_at(Instant::now())
    }

    pub fn maybe_log_at(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_log_time) < LOG_INTERVAL {
            return false;
        }

        let frames = self.frames.max(1);
        debug!(
            "DRAWLIST METRICS: frames={}, draws/frame={:.1}, program binds/frame={:.1}, \
             texture binds/frame={:.1}, state changes/frame={:.1}, sorts={}, peak unique states={}",
            self.frames,
            self.draws as f64 / frames as f64,
            self.program_binds as f64 / frames as f64,
            self.texture_binds as f64 / frames as f64,
            self.state_changes as f64 / frames as f64,
            self.sorts,
            self.peak_unique_states,
        );

        self.frames = 0;
        self.draws = 0;
        self.program_binds = 0;
        self.texture_binds = 0;
        self.state_changes = 0;
        self.sorts = 0;
        self.peak_unique_states = 0;
        self.last_log_time = now;
        true
    }
}
