use wasm_bindgen::prelude::*;

/// Per-step timing and table-usage snapshot, exposed to the host as plain
/// getters. All zeros while perf metrics are disabled.
#[wasm_bindgen]
#[derive(Clone, Default)]
pub struct PerfStats {
    pub(super) step_ms: f64,
    pub(super) rebuild_ms: f64,
    pub(super) broad_ms: f64,
    pub(super) cull_ms: f64,
    pub(super) resolve_ms: f64,
    pub(super) player_ms: f64,
    pub(super) anim_ms: f64,

    pub(super) object_count: u32,
    pub(super) broad_candidates: u32,
    pub(super) culled_candidates: u32,
    pub(super) event_count: u32,
    pub(super) dropped_events: u32,
    pub(super) snapshot_usage: f32,
    pub(super) grid_cells: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn step_ms(&self) -> f64 { self.step_ms }
    #[wasm_bindgen(getter)]
    pub fn rebuild_ms(&self) -> f64 { self.rebuild_ms }
    #[wasm_bindgen(getter)]
    pub fn broad_ms(&self) -> f64 { self.broad_ms }
    #[wasm_bindgen(getter)]
    pub fn cull_ms(&self) -> f64 { self.cull_ms }
    #[wasm_bindgen(getter)]
    pub fn resolve_ms(&self) -> f64 { self.resolve_ms }
    #[wasm_bindgen(getter)]
    pub fn player_ms(&self) -> f64 { self.player_ms }
    #[wasm_bindgen(getter)]
    pub fn anim_ms(&self) -> f64 { self.anim_ms }

    #[wasm_bindgen(getter)]
    pub fn object_count(&self) -> u32 { self.object_count }
    #[wasm_bindgen(getter)]
    pub fn broad_candidates(&self) -> u32 { self.broad_candidates }
    #[wasm_bindgen(getter)]
    pub fn culled_candidates(&self) -> u32 { self.culled_candidates }
    #[wasm_bindgen(getter)]
    pub fn event_count(&self) -> u32 { self.event_count }
    #[wasm_bindgen(getter)]
    pub fn dropped_events(&self) -> u32 { self.dropped_events }
    #[wasm_bindgen(getter)]
    pub fn snapshot_usage(&self) -> f32 { self.snapshot_usage }
    #[wasm_bindgen(getter)]
    pub fn grid_cells(&self) -> u32 { self.grid_cells }
}
