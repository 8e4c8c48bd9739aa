//! ScalarKernel - the host-side reference fallback.
//!
//! Plain per-element math, no batching. This path must always be available:
//! it is what the world runs on when the batched kernel fails its self-check,
//! and it is the reference the self-check compares against.

use super::{OCTAVE_AMPS, OCTAVE_FREQS, WAVE_PHASE_STEP};

pub struct ScalarKernel;

impl ScalarKernel {
    pub fn new() -> Self {
        ScalarKernel
    }

    pub fn ground_height(&self, x: f32, z: f32) -> f32 {
        let mut h = 0.0f32;
        for (amp, freq) in OCTAVE_AMPS.iter().zip(OCTAVE_FREQS.iter()) {
            h += (x * freq).sin() * amp + (z * freq).cos() * amp;
        }
        h
    }

    /// Integer lattice hash in [-1, 1). Wrapping arithmetic mirrors the
    /// original i32 overflow behavior exactly.
    pub fn hash2(&self, x: f32, y: f32) -> f32 {
        let ix = (x * 1000.0) as i32;
        let iy = (y * 1000.0) as i32;
        let mut n = ix.wrapping_add(iy.wrapping_mul(57));
        n = (n.wrapping_shl(13)) ^ n;
        let poly = n
            .wrapping_mul(
                n.wrapping_mul(n)
                    .wrapping_mul(15731)
                    .wrapping_add(789_221),
            )
            .wrapping_add(1_376_312_589)
            & 0x7fff_ffff;
        1.0 - (poly as f32) / 1_073_741_824.0
    }

    #[inline]
    pub fn lerp(&self, a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    #[inline]
    fn smoothstep(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    pub fn value_noise2(&self, x: f32, y: f32) -> f32 {
        let ix = x.floor();
        let iy = y.floor();
        let fx = Self::smoothstep(x - ix);
        let fy = Self::smoothstep(y - iy);
        let v00 = self.hash2(ix, iy);
        let v10 = self.hash2(ix + 1.0, iy);
        let v01 = self.hash2(ix, iy + 1.0);
        let v11 = self.hash2(ix + 1.0, iy + 1.0);
        let v0 = self.lerp(v00, v10, fx);
        let v1 = self.lerp(v01, v11, fx);
        self.lerp(v0, v1, fy)
    }

    pub fn fbm(&self, x: f32, y: f32, octaves: u32) -> f32 {
        let mut value = 0.0f32;
        let mut amplitude = 0.5f32;
        let mut frequency = 1.0f32;
        for _ in 0..octaves {
            value += amplitude * self.value_noise2(x * frequency, y * frequency);
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        value
    }

    pub fn smooth_damp(
        &self,
        current: f32,
        target: f32,
        velocity: f32,
        smooth_time: f32,
        dt: f32,
    ) -> (f32, f32) {
        let omega = 2.0 / smooth_time;
        let x = omega * dt;
        let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
        let change = current - target;
        let temp = (velocity + omega * change) * dt;
        let new_velocity = (velocity - omega * temp) * exp;
        (target + (change + temp) * exp, new_velocity)
    }

    pub fn wave_deltas(&self, out: &mut [f32], time: f32, freq: f32, amp: f32) {
        for (i, slot) in out.iter_mut().enumerate() {
            let offset = i as f32 * WAVE_PHASE_STEP;
            *slot = ((time + offset) * freq).sin() * amp;
        }
    }

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
        let mut visible = 0u32;
        for i in 0..flags.len() {
            let dx = xs[i] - rx;
            let dy = ys[i] - ry;
            let dz = zs[i] - rz;
            let d2 = dx * dx + dy * dy + dz * dz;
            let allowance = reach + radii[i];
            if d2 <= allowance * allowance {
                flags[i] = 1;
                visible += 1;
            } else {
                flags[i] = 0;
            }
        }
        visible
    }
}

impl Default for ScalarKernel {
    fn default() -> Self {
        Self::new()
    }
}
