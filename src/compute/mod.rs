//! Numeric kernels behind a single capability surface.
//!
//! Every exposed numeric function (ground-height sampling, lattice hashing,
//! interpolation, batched per-object animation deltas, batched distance
//! culling) exists twice with identical numeric intent:
//!
//! - [`BatchedKernel`] - the hot path. Block-processed 4-lane loops over the
//!   interop tables, written so the wasm backend vectorizes them.
//! - [`ScalarKernel`] - the reference fallback. Plain per-element math.
//!
//! Selection happens exactly once at world init: the batched kernel runs a
//! self-check against reference values and the world degrades to the scalar
//! kernel when it fails (logged once, never a crash). Hot code calls through
//! [`Kernel`] and never re-selects per frame.

mod batched;
mod scalar;

pub use batched::BatchedKernel;
pub use scalar::ScalarKernel;

use crate::core::console;

// Ground height is a fixed three-octave sine/cosine field over world (x, z).
// It gates walk/swim/fall transitions, so both kernels must agree on it.
pub(crate) const OCTAVE_AMPS: [f32; 3] = [2.0, 0.8, 0.3];
pub(crate) const OCTAVE_FREQS: [f32; 3] = [0.05, 0.1, 0.2];

/// Per-index phase offset of the batched animation wave.
pub(crate) const WAVE_PHASE_STEP: f32 = 0.1;

/// The one indirection point between the frame loop and the numeric core.
pub enum Kernel {
    Batched(BatchedKernel),
    Scalar(ScalarKernel),
}

impl Kernel {
    /// Select the batched kernel when its self-check passes, otherwise
    /// degrade to the scalar fallback. Called once at world init.
    pub fn select() -> Self {
        match BatchedKernel::init() {
            Ok(kernel) => Kernel::Batched(kernel),
            Err(why) => {
                console::warn(&format!(
                    "compute: batched kernel unavailable ({why}); using scalar fallback"
                ));
                Kernel::Scalar(ScalarKernel::new())
            }
        }
    }

    /// Force the fallback path (startup degradation and parity tests).
    pub fn fallback() -> Self {
        Kernel::Scalar(ScalarKernel::new())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Batched(_) => "batched",
            Kernel::Scalar(_) => "scalar",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Kernel::Scalar(_))
    }

    #[inline]
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        match self {
            Kernel::Batched(k) => k.ground_height(x, z),
            Kernel::Scalar(k) => k.ground_height(x, z),
        }
    }

    #[inline]
    pub fn hash2(&self, x: f32, y: f32) -> f32 {
        match self {
            Kernel::Batched(k) => k.hash2(x, y),
            Kernel::Scalar(k) => k.hash2(x, y),
        }
    }

    #[inline]
    pub fn lerp(&self, a: f32, b: f32, t: f32) -> f32 {
        match self {
            Kernel::Batched(k) => k.lerp(a, b, t),
            Kernel::Scalar(k) => k.lerp(a, b, t),
        }
    }

    #[inline]
    pub fn value_noise2(&self, x: f32, y: f32) -> f32 {
        match self {
            Kernel::Batched(k) => k.value_noise2(x, y),
            Kernel::Scalar(k) => k.value_noise2(x, y),
        }
    }

    #[inline]
    pub fn fbm(&self, x: f32, y: f32, octaves: u32) -> f32 {
        match self {
            Kernel::Batched(k) => k.fbm(x, y, octaves),
            Kernel::Scalar(k) => k.fbm(x, y, octaves),
        }
    }

    /// Critically-damped approach (camera/feel smoothing). Returns the new
    /// value and the new velocity.
    #[inline]
    pub fn smooth_damp(
        &self,
        current: f32,
        target: f32,
        velocity: f32,
        smooth_time: f32,
        dt: f32,
    ) -> (f32, f32) {
        match self {
            Kernel::Batched(k) => k.smooth_damp(current, target, velocity, smooth_time, dt),
            Kernel::Scalar(k) => k.smooth_damp(current, target, velocity, smooth_time, dt),
        }
    }

    /// Fill `out[i]` with the bob delta `sin((time + i*0.1) * freq) * amp`
    /// for each animated object.
    #[inline]
    pub fn wave_deltas(&self, out: &mut [f32], time: f32, freq: f32, amp: f32) {
        match self {
            Kernel::Batched(k) => k.wave_deltas(out, time, freq, amp),
            Kernel::Scalar(k) => k.wave_deltas(out, time, freq, amp),
        }
    }

    /// Flag every point within `reach + radii[i]` of the reference point
    /// (1 = inside). The per-point radius widens the cull sphere so that
    /// objects with a long interaction range (a rope longer than the query
    /// reach) are never dropped while still in range. Returns the number of
    /// flagged points.
    #[inline]
    pub fn cull_within(
        &self,
        xs: &[f32],
        ys: &[f32],
        zs: &[f32],
        radii: &[f32],
        flags: &mut [u8],
        rx: f32,
        ry: f32,
        rz: f32,
        reach: f32,
    ) -> u32 {
        match self {
            Kernel::Batched(k) => k.cull_within(xs, ys, zs, radii, flags, rx, ry, rz, reach),
            Kernel::Scalar(k) => k.cull_within(xs, ys, zs, radii, flags, rx, ry, rz, reach),
        }
    }
}
