//! Xorshift32 - the frame rng.
//!
//! Deterministic per seed, no allocation, good enough for feel jitter.

#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform in [-1, 1).
#[inline]
pub fn signed_unit(state: &mut u32) -> f32 {
    let v = xorshift32(state);
    (v as f32 / u32::MAX as f32) * 2.0 - 1.0
}
