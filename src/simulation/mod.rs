//! WorldCore - frame orchestration.
//!
//! The core owns every long-lived piece of state (object snapshot, spatial
//! grid, numeric kernel, interop tables, player) and wires them into the
//! fixed per-frame pipeline in `step/step.rs`. It orchestrates only; the
//! actual work lives in the spatial, compute, resolve and player modules.
//!
//! The wasm facade in `facade.rs` is a thin forwarding shell so the core
//! stays testable on native targets.

use crate::compute::Kernel;
use crate::domain::objects::{ObjectId, WorldSnapshot};
use crate::domain::tuning::Tuning;
use crate::interop::InteropBuffer;
use crate::spatial::SpatialGrid;
use crate::systems::player::PlayerState;
use crate::systems::resolve::{Contacts, RuleRegistry};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "events/events.rs"]
mod events;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use events::{EVT_BOUNCED, EVT_DETACHED, EVT_DISCOVERED, EVT_TETHERED};
pub use facade::{AbiLayout, World};
pub use perf_stats::PerfStats;

use perf_timer::PerfTimer;

pub(crate) struct AbiLayoutData {
    pub(crate) commands_ptr: *const f32,
    pub(crate) commands_len_elements: usize,
    pub(crate) results_ptr: *const f32,
    pub(crate) results_len_elements: usize,
    pub(crate) event_kind_ptr: *const u32,
    pub(crate) event_object_ptr: *const u32,
    pub(crate) event_x_ptr: *const f32,
    pub(crate) event_y_ptr: *const f32,
    pub(crate) event_z_ptr: *const f32,
    pub(crate) event_capacity: usize,
    pub(crate) cand_slot_ptr: *const u32,
    pub(crate) anim_delta_ptr: *const f32,
    pub(crate) cand_capacity: usize,
}

/// The physics world.
pub struct WorldCore {
    tuning: Tuning,
    snapshot: WorldSnapshot,
    grid: SpatialGrid,
    kernel: Kernel,
    rules: RuleRegistry,
    interop: InteropBuffer,
    player: PlayerState,
    contacts: Contacts,

    // Frame-loop scratch: broad-phase ids, reused without reallocation.
    candidate_ids: Vec<ObjectId>,

    // Bitmask of kind codes the player has ever had in the candidate set.
    kinds_discovered: u32,
    grid_dirty: bool,

    // A tether released outside the step (anchor removed, world cleared)
    // still owes the host a detach event on the next frame.
    pending_detach: bool,

    time: f32,
    frame: u64,
    rng_state: u32,
    warned_snapshot_full: bool,

    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl WorldCore {
    /// Create a world with the player dropped a little above the terrain at
    /// the given spawn column.
    pub fn new(spawn_x: f32, spawn_z: f32) -> Self {
        init::create_world_core(spawn_x, spawn_z, Tuning::default())
    }

    pub fn new_with_tuning(spawn_x: f32, spawn_z: f32, tuning: Tuning) -> Self {
        init::create_world_core(spawn_x, spawn_z, tuning)
    }

    pub fn load_tuning_bundle_json(&mut self, json: &str) -> Result<(), String> {
        let tuning = Tuning::from_bundle_json(json)?;
        settings::apply_tuning(self, tuning);
        Ok(())
    }

    pub fn tuning_manifest_json(&self) -> String {
        self.tuning.manifest_json()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn object_count(&self) -> usize {
        self.snapshot.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.interop.cand_count
    }

    pub fn event_count(&self) -> usize {
        self.interop.event_count
    }

    pub fn snapshot_usage(&self) -> f32 {
        self.interop.snapshot_usage()
    }

    pub fn dropped_events(&self) -> u32 {
        self.interop.dropped_events()
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when
    /// enabled).
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last step perf snapshot (zeros when perf disabled).
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    pub fn kernel_name(&self) -> &'static str {
        self.kernel.name()
    }

    pub fn kernel_is_fallback(&self) -> bool {
        self.kernel.is_fallback()
    }

    /// Terrain height at world (x, z), through whichever kernel is active.
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.kernel.ground_height(x, z)
    }

    // The host drives procedural placement and camera feel off the same
    // numeric capability surface physics uses, so placements and smoothing
    // agree with the active kernel bit-for-bit.

    pub fn hash2(&self, x: f32, y: f32) -> f32 {
        self.kernel.hash2(x, y)
    }

    pub fn lerp(&self, a: f32, b: f32, t: f32) -> f32 {
        self.kernel.lerp(a, b, t)
    }

    pub fn value_noise2(&self, x: f32, y: f32) -> f32 {
        self.kernel.value_noise2(x, y)
    }

    pub fn fbm(&self, x: f32, y: f32, octaves: u32) -> f32 {
        self.kernel.fbm(x, y, octaves)
    }

    /// Critically damped approach toward a target; returns the new value and
    /// the new velocity.
    pub fn smooth_damp(
        &self,
        current: f32,
        target: f32,
        velocity: f32,
        smooth_time: f32,
        dt: f32,
    ) -> (f32, f32) {
        self.kernel
            .smooth_damp(current, target, velocity, smooth_time, dt)
    }

    /// Add or update an environment object from wire-format parameters.
    /// Returns false (with a one-time warning on capacity) when rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn register_object(
        &mut self,
        id: ObjectId,
        kind_code: u8,
        x: f32,
        y: f32,
        z: f32,
        radius: f32,
        param_a: f32,
        param_b: f32,
    ) -> bool {
        commands::register_object(self, id, kind_code, x, y, z, radius, param_a, param_b)
    }

    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        commands::remove_object(self, id)
    }

    pub fn clear_objects(&mut self) {
        commands::clear_objects(self)
    }

    /// Teleport the player (spawn points, respawn). Clears velocity and any
    /// active tether.
    pub fn set_player_position(&mut self, x: f32, y: f32, z: f32) {
        commands::set_player_position(self, x, y, z)
    }

    /// Force a broad-phase rebuild now instead of at the next step.
    pub fn rebuild_spatial_index(&mut self) {
        commands::rebuild_spatial_index(self)
    }

    /// Write the per-frame command slots (the facade also exposes the raw
    /// command table pointer for hosts that write linear memory directly).
    pub fn set_frame_input(
        &mut self,
        dt: f32,
        move_x: f32,
        move_z: f32,
        facing_x: f32,
        facing_z: f32,
        beat: f32,
    ) {
        commands::set_frame_input(self, dt, move_x, move_z, facing_x, facing_z, beat)
    }

    /// Set the discrete input edges for the next step (consumed by it).
    pub fn set_input_flags(&mut self, flags: u32) {
        self.interop.command_flags = flags;
    }

    /// Advance the world by one frame: rebuild if dirty, broad phase, batch
    /// cull, narrow phase, player integration, events, animation deltas,
    /// result writeback.
    pub fn step(&mut self) {
        step::step(self);
    }

    // Player readback (the result table carries the same values across the
    // boundary; these are for native callers and tests).

    pub fn player_x(&self) -> f32 {
        self.player.x
    }

    pub fn player_y(&self) -> f32 {
        self.player.y
    }

    pub fn player_z(&self) -> f32 {
        self.player.z
    }

    pub fn player_mode_code(&self) -> u8 {
        self.player.mode.code()
    }

    #[cfg(test)]
    pub(crate) fn player(&self) -> &PlayerState {
        &self.player
    }

    #[cfg(test)]
    pub(crate) fn interop(&self) -> &InteropBuffer {
        &self.interop
    }

    pub(crate) fn abi_layout_data(&self) -> AbiLayoutData {
        AbiLayoutData {
            commands_ptr: self.interop.commands_ptr(),
            commands_len_elements: crate::interop::COMMAND_SLOTS,
            results_ptr: self.interop.results_ptr(),
            results_len_elements: crate::interop::RESULT_SLOTS,
            event_kind_ptr: self.interop.event_kind_ptr(),
            event_object_ptr: self.interop.event_object_ptr(),
            event_x_ptr: self.interop.event_x_ptr(),
            event_y_ptr: self.interop.event_y_ptr(),
            event_z_ptr: self.interop.event_z_ptr(),
            event_capacity: crate::interop::EVENT_CAPACITY,
            cand_slot_ptr: self.interop.cand_slot_ptr(),
            anim_delta_ptr: self.interop.anim_delta_ptr(),
            cand_capacity: crate::interop::CANDIDATE_CAPACITY,
        }
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
