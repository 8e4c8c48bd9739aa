use crate::spatial::SpatialGrid;
use crate::domain::tuning::Tuning;

use super::perf_stats::PerfStats;
use super::WorldCore;

pub(super) fn enable_perf_metrics(world: &mut WorldCore, enabled: bool) {
    world.perf_enabled = enabled;
    if !enabled {
        world.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(world: &WorldCore) -> PerfStats {
    world.perf_stats.clone()
}

/// Swap in a validated tuning bundle. A changed cell size invalidates the
/// whole broad-phase partition, so the grid is recreated and rebuilt.
pub(super) fn apply_tuning(world: &mut WorldCore, tuning: Tuning) {
    let cell_changed = tuning.cell_size != world.tuning.cell_size;
    world.tuning = tuning;
    if cell_changed {
        world.grid = SpatialGrid::new(world.tuning.cell_size);
        world.grid.rebuild(&world.snapshot);
        world.interop.sync_snapshot(&world.snapshot);
        world.grid_dirty = false;
    }
}
