use wasm_bindgen::prelude::*;

use super::perf_stats::PerfStats;
use super::WorldCore;

/// Pointer/length map of every shared table, fetched once after init so the
/// host can build its typed-array views over linear memory.
#[wasm_bindgen]
pub struct AbiLayout {
    commands_ptr: u32,
    commands_len_elements: u32,
    results_ptr: u32,
    results_len_elements: u32,
    event_kind_ptr: u32,
    event_object_ptr: u32,
    event_x_ptr: u32,
    event_y_ptr: u32,
    event_z_ptr: u32,
    event_capacity: u32,
    cand_slot_ptr: u32,
    anim_delta_ptr: u32,
    cand_capacity: u32,
}

#[wasm_bindgen]
impl AbiLayout {
    #[wasm_bindgen(getter)]
    pub fn commands_ptr(&self) -> u32 { self.commands_ptr }
    #[wasm_bindgen(getter)]
    pub fn commands_len_elements(&self) -> u32 { self.commands_len_elements }

    #[wasm_bindgen(getter)]
    pub fn results_ptr(&self) -> u32 { self.results_ptr }
    #[wasm_bindgen(getter)]
    pub fn results_len_elements(&self) -> u32 { self.results_len_elements }

    #[wasm_bindgen(getter)]
    pub fn event_kind_ptr(&self) -> u32 { self.event_kind_ptr }
    #[wasm_bindgen(getter)]
    pub fn event_object_ptr(&self) -> u32 { self.event_object_ptr }
    #[wasm_bindgen(getter)]
    pub fn event_x_ptr(&self) -> u32 { self.event_x_ptr }
    #[wasm_bindgen(getter)]
    pub fn event_y_ptr(&self) -> u32 { self.event_y_ptr }
    #[wasm_bindgen(getter)]
    pub fn event_z_ptr(&self) -> u32 { self.event_z_ptr }
    #[wasm_bindgen(getter)]
    pub fn event_capacity(&self) -> u32 { self.event_capacity }

    #[wasm_bindgen(getter)]
    pub fn cand_slot_ptr(&self) -> u32 { self.cand_slot_ptr }
    #[wasm_bindgen(getter)]
    pub fn anim_delta_ptr(&self) -> u32 { self.anim_delta_ptr }
    #[wasm_bindgen(getter)]
    pub fn cand_capacity(&self) -> u32 { self.cand_capacity }
}

#[wasm_bindgen]
pub struct World {
    core: WorldCore,
}

#[wasm_bindgen]
impl World {
    /// Create a world with the player spawned above the terrain at (x, z).
    #[wasm_bindgen(constructor)]
    pub fn new(spawn_x: f32, spawn_z: f32) -> Self {
        Self {
            core: WorldCore::new(spawn_x, spawn_z),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 { self.core.frame() }

    #[wasm_bindgen(getter)]
    pub fn object_count(&self) -> usize { self.core.object_count() }

    #[wasm_bindgen(getter)]
    pub fn candidate_count(&self) -> usize { self.core.candidate_count() }

    #[wasm_bindgen(getter)]
    pub fn event_count(&self) -> usize { self.core.event_count() }

    /// Fraction of the object table in use.
    pub fn snapshot_usage(&self) -> f32 {
        self.core.snapshot_usage()
    }

    pub fn dropped_events(&self) -> u32 {
        self.core.dropped_events()
    }

    /// Active numeric kernel ("batched" or "scalar").
    pub fn kernel_name(&self) -> String {
        self.core.kernel_name().to_string()
    }

    pub fn kernel_is_fallback(&self) -> bool {
        self.core.kernel_is_fallback()
    }

    /// Terrain height at world (x, z). The host samples this for placement
    /// and rendering; it matches what physics stands the player on.
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.core.ground_height(x, z)
    }

    // Numeric capability surface for host-side procedural placement and
    // camera smoothing, routed through the active kernel.

    pub fn hash2(&self, x: f32, y: f32) -> f32 {
        self.core.hash2(x, y)
    }

    pub fn lerp(&self, a: f32, b: f32, t: f32) -> f32 {
        self.core.lerp(a, b, t)
    }

    pub fn value_noise2(&self, x: f32, y: f32) -> f32 {
        self.core.value_noise2(x, y)
    }

    pub fn fbm(&self, x: f32, y: f32, octaves: u32) -> f32 {
        self.core.fbm(x, y, octaves)
    }

    /// Critically damped approach toward a target. Returns `[value, velocity]`.
    pub fn smooth_damp(
        &self,
        current: f32,
        target: f32,
        velocity: f32,
        smooth_time: f32,
        dt: f32,
    ) -> Box<[f32]> {
        let (v, vel) = self.core.smooth_damp(current, target, velocity, smooth_time, dt);
        Box::new([v, vel])
    }

    /// Add or update an environment object. `kind` is a wire code; the two
    /// params depend on it. Returns false when the object is rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn register_object(
        &mut self,
        id: u32,
        kind: u8,
        x: f32,
        y: f32,
        z: f32,
        radius: f32,
        param_a: f32,
        param_b: f32,
    ) -> bool {
        self.core
            .register_object(id, kind, x, y, z, radius, param_a, param_b)
    }

    pub fn remove_object(&mut self, id: u32) -> bool {
        self.core.remove_object(id)
    }

    pub fn clear_objects(&mut self) {
        self.core.clear_objects();
    }

    /// Teleport the player; clears velocity and any active tether.
    pub fn set_player_position(&mut self, x: f32, y: f32, z: f32) {
        self.core.set_player_position(x, y, z);
    }

    pub fn rebuild_spatial_index(&mut self) {
        self.core.rebuild_spatial_index();
    }

    /// Convenience command write for hosts that do not map the command table
    /// directly.
    pub fn set_frame_input(
        &mut self,
        dt: f32,
        move_x: f32,
        move_z: f32,
        facing_x: f32,
        facing_z: f32,
        beat: f32,
    ) {
        self.core
            .set_frame_input(dt, move_x, move_z, facing_x, facing_z, beat);
    }

    /// Discrete input edges for the next step (jump/dash/attach/detach bits).
    pub fn set_input_flags(&mut self, flags: u32) {
        self.core.set_input_flags(flags);
    }

    /// Advance the world by one frame.
    pub fn step(&mut self) {
        self.core.step();
    }

    // Player readback mirrors the result table for hosts that prefer calls
    // over memory views.

    #[wasm_bindgen(getter)]
    pub fn player_x(&self) -> f32 { self.core.player_x() }

    #[wasm_bindgen(getter)]
    pub fn player_y(&self) -> f32 { self.core.player_y() }

    #[wasm_bindgen(getter)]
    pub fn player_z(&self) -> f32 { self.core.player_z() }

    #[wasm_bindgen(getter)]
    pub fn player_mode(&self) -> u8 { self.core.player_mode_code() }

    pub fn load_tuning_bundle(&mut self, json: String) -> Result<(), JsValue> {
        self.core
            .load_tuning_bundle_json(&json)
            .map_err(|e| JsValue::from_str(&e))?;
        Ok(())
    }

    pub fn get_tuning_manifest_json(&self) -> String {
        self.core.tuning_manifest_json()
    }

    /// Enable or disable per-step perf metrics (adds timing overhead when
    /// enabled).
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Get last step perf snapshot (zeros when perf disabled).
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    pub fn abi_layout(&self) -> AbiLayout {
        let data = self.core.abi_layout_data();
        AbiLayout {
            commands_ptr: data.commands_ptr as u32,
            commands_len_elements: data.commands_len_elements as u32,
            results_ptr: data.results_ptr as u32,
            results_len_elements: data.results_len_elements as u32,
            event_kind_ptr: data.event_kind_ptr as u32,
            event_object_ptr: data.event_object_ptr as u32,
            event_x_ptr: data.event_x_ptr as u32,
            event_y_ptr: data.event_y_ptr as u32,
            event_z_ptr: data.event_z_ptr as u32,
            event_capacity: data.event_capacity as u32,
            cand_slot_ptr: data.cand_slot_ptr as u32,
            anim_delta_ptr: data.anim_delta_ptr as u32,
            cand_capacity: data.cand_capacity as u32,
        }
    }
}
