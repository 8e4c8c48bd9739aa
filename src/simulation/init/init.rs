use crate::compute::Kernel;
use crate::domain::objects::WorldSnapshot;
use crate::domain::tuning::Tuning;
use crate::interop::{InteropBuffer, CANDIDATE_CAPACITY};
use crate::spatial::SpatialGrid;
use crate::systems::player::PlayerState;
use crate::systems::resolve::{Contacts, RuleRegistry};

use super::perf_stats::PerfStats;
use super::WorldCore;

pub(super) fn create_world_core(spawn_x: f32, spawn_z: f32, tuning: Tuning) -> WorldCore {
    // Kernel selection happens exactly once, here. A failed self-check logs
    // and degrades inside select(); the world itself always comes up.
    let kernel = Kernel::select();
    let spawn_y = kernel.ground_height(spawn_x, spawn_z) + 2.0;

    WorldCore {
        grid: SpatialGrid::new(tuning.cell_size),
        snapshot: WorldSnapshot::new(),
        rules: RuleRegistry::new(),
        interop: InteropBuffer::new(),
        player: PlayerState::new(spawn_x, spawn_y, spawn_z),
        contacts: Contacts::new(),
        candidate_ids: Vec::with_capacity(CANDIDATE_CAPACITY),
        kinds_discovered: 0,
        grid_dirty: false,
        pending_detach: false,
        time: 0.0,
        frame: 0,
        rng_state: 12345,
        warned_snapshot_full: false,
        perf_enabled: false,
        perf_stats: PerfStats::default(),
        kernel,
        tuning,
    }
}
