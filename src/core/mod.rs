//! Core utilities shared by every system: zero-cost access macros,
//! console logging that works on both sides of the WASM boundary,
//! and the frame rng.

#[macro_use]
pub mod safety;

pub mod console;
pub mod rand;
