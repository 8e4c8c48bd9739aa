//! BatchedKernel - the hot numeric path.
//!
//! Batch operations walk the interop tables in blocks of 4 lanes with no
//! per-record headers, the layout the wasm backend vectorizes. Point queries
//! reuse the same octave constants as the fallback so both paths carry the
//! same numeric intent.
//!
//! `init` runs a self-check against reference values before the kernel is
//! allowed near the frame loop; any mismatch (miscompiled build, broken
//! runtime) degrades the world to the scalar kernel instead of crashing.

use super::scalar::ScalarKernel;
use super::{OCTAVE_AMPS, OCTAVE_FREQS, WAVE_PHASE_STEP};

const LANES: usize = 4;

/// Tolerance of the init self-check, matching the documented parity bound.
const SELF_CHECK_EPS: f32 = 1e-4;

pub struct BatchedKernel {
    // Point-query math is shared with the reference path; what the batched
    // kernel adds is the block-processed table walks below.
    inner: ScalarKernel,
}

impl BatchedKernel {
    /// Build the kernel and verify it against reference values.
    pub fn init() -> Result<Self, &'static str> {
        let kernel = BatchedKernel {
            inner: ScalarKernel::new(),
        };
        kernel.self_check()?;
        Ok(kernel)
    }

    fn self_check(&self) -> Result<(), &'static str> {
        let reference = ScalarKernel::new();

        // Probe the ground-height field at fixed world samples.
        for (x, z) in [(0.0f32, 0.0f32), (12.5, -7.25), (-431.0, 280.5)] {
            if (self.ground_height(x, z) - reference.ground_height(x, z)).abs() > SELF_CHECK_EPS {
                return Err("ground-height probe mismatch");
            }
        }
        if self.hash2(3.7, -9.1) != reference.hash2(3.7, -9.1) {
            return Err("hash probe mismatch");
        }

        // Exercise one full block plus a remainder lane.
        let mut batched = [0.0f32; LANES + 1];
        let mut scalar = [0.0f32; LANES + 1];
        self.wave_deltas(&mut batched, 5.5, 2.0, 0.25);
        reference.wave_deltas(&mut scalar, 5.5, 2.0, 0.25);
        for (a, b) in batched.iter().zip(scalar.iter()) {
            if (a - b).abs() > SELF_CHECK_EPS {
                return Err("wave-delta probe mismatch");
            }
        }
        Ok(())
    }

    #[inline]
    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        let mut h = 0.0f32;
        for (amp, freq) in OCTAVE_AMPS.iter().zip(OCTAVE_FREQS.iter()) {
            h += (x * freq).sin() * amp + (z * freq).cos() * amp;
        }
        h
    }

    #[inline]
    pub fn hash2(&self, x: f32, y: f32) -> f32 {
        self.inner.hash2(x, y)
    }

    #[inline]
    pub fn lerp(&self, a: f32, b: f32, t: f32) -> f32 {
        self.inner.lerp(a, b, t)
    }

    #[inline]
    pub fn value_noise2(&self, x: f32, y: f32) -> f32 {
        self.inner.value_noise2(x, y)
    }

    #[inline]
    pub fn fbm(&self, x: f32, y: f32, octaves: u32) -> f32 {
        self.inner.fbm(x, y, octaves)
    }

    #[inline]
    pub fn smooth_damp(
        &self,
        current: f32,
        target: f32,
        velocity: f32,
        smooth_time: f32,
        dt: f32,
    ) -> (f32, f32) {
        self.inner.smooth_damp(current, target, velocity, smooth_time, dt)
    }

    /// Block-processed bob deltas over a flat table.
    pub fn wave_deltas(&self, out: &mut [f32], time: f32, freq: f32, amp: f32) {
        let blocks = out.len() / LANES;
        for b in 0..blocks {
            let base = b * LANES;
            let phase = [
                (time + (base) as f32 * WAVE_PHASE_STEP) * freq,
                (time + (base + 1) as f32 * WAVE_PHASE_STEP) * freq,
                (time + (base + 2) as f32 * WAVE_PHASE_STEP) * freq,
                (time + (base + 3) as f32 * WAVE_PHASE_STEP) * freq,
            ];
            for lane in 0..LANES {
                hot!(out, [base + lane] = phase[lane].sin() * amp);
            }
        }
        for i in (blocks * LANES)..out.len() {
            let offset = i as f32 * WAVE_PHASE_STEP;
            hot!(out, [i] = ((time + offset) * freq).sin() * amp);
        }
    }

    /// Block-processed distance cull against a reference point. Each point
    /// carries its own interaction radius, widening its cull sphere to
    /// `reach + radius`.
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
        debug_assert!(
            xs.len() >= flags.len()
                && ys.len() >= flags.len()
                && zs.len() >= flags.len()
                && radii.len() >= flags.len()
        );
        let count = flags.len();
        let blocks = count / LANES;
        let mut visible = 0u32;
        for b in 0..blocks {
            let base = b * LANES;
            let mut d2 = [0.0f32; LANES];
            let mut a2 = [0.0f32; LANES];
            for lane in 0..LANES {
                let i = base + lane;
                let dx = *hot!(xs, [i]) - rx;
                let dy = *hot!(ys, [i]) - ry;
                let dz = *hot!(zs, [i]) - rz;
                d2[lane] = dx * dx + dy * dy + dz * dz;
                let allowance = reach + *hot!(radii, [i]);
                a2[lane] = allowance * allowance;
            }
            for lane in 0..LANES {
                let inside = d2[lane] <= a2[lane];
                hot!(flags, [base + lane] = inside as u8);
                visible += inside as u32;
            }
        }
        for i in (blocks * LANES)..count {
            let dx = xs[i] - rx;
            let dy = ys[i] - ry;
            let dz = zs[i] - rz;
            let allowance = reach + radii[i];
            let inside = dx * dx + dy * dy + dz * dz <= allowance * allowance;
            flags[i] = inside as u8;
            visible += inside as u32;
        }
        visible
    }
}
