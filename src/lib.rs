//! Candy World Engine - exploration-world physics core in WASM
//!
//! The engine owns simulation state and the frame pipeline: spatial broad
//! phase over registered environment objects, batched numeric kernels,
//! per-kind contact resolution and the player physics state machine. The
//! JS host owns rendering, audio and input; the two sides meet at a small
//! set of pre-allocated shared tables (see `interop`).
//!
//! Architecture:
//! - core/        - safety macro, console logging, rng
//! - compute/     - numeric kernels (batched hot path + scalar fallback)
//! - spatial/     - uniform grid broad phase
//! - domain/      - environment objects, world snapshot, tuning bundle
//! - systems/     - contact rules and the player state machine
//! - interop/     - shared-memory frame tables
//! - simulation/  - WorldCore orchestration and the wasm facade

// Safety macros must come first for macro export.
#[macro_use]
pub mod core;
pub mod compute;
pub mod domain;
pub mod interop;
pub mod simulation;
pub mod spatial;
pub mod systems;

pub mod world {
    pub use crate::simulation::*;
}

use wasm_bindgen::prelude::*;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    crate::core::console::log("candyworld engine initialized");
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use domain::objects::{EnvObject, ObjectId, ObjectKind, WorldSnapshot};
pub use domain::tuning::Tuning;
pub use simulation::{PerfStats, World, WorldCore};

// Export object kind codes for JS
#[wasm_bindgen]
pub fn kind_platform() -> u8 { domain::objects::KIND_PLATFORM }
#[wasm_bindgen]
pub fn kind_trampoline() -> u8 { domain::objects::KIND_TRAMPOLINE }
#[wasm_bindgen]
pub fn kind_water_gate() -> u8 { domain::objects::KIND_WATER_GATE }
#[wasm_bindgen]
pub fn kind_tether_anchor() -> u8 { domain::objects::KIND_TETHER_ANCHOR }
#[wasm_bindgen]
pub fn kind_climbable() -> u8 { domain::objects::KIND_CLIMBABLE }
#[wasm_bindgen]
pub fn kind_obstacle() -> u8 { domain::objects::KIND_OBSTACLE }

// Export event kind codes for JS
#[wasm_bindgen]
pub fn evt_bounced() -> u32 { simulation::EVT_BOUNCED }
#[wasm_bindgen]
pub fn evt_tethered() -> u32 { simulation::EVT_TETHERED }
#[wasm_bindgen]
pub fn evt_detached() -> u32 { simulation::EVT_DETACHED }
#[wasm_bindgen]
pub fn evt_discovered() -> u32 { simulation::EVT_DISCOVERED }
