//! Bounds-check policy for hot loops.
//!
//! Debug builds index normally and panic with a useful message when an index
//! is wrong. Release builds use unchecked access, because the per-frame loops
//! over the interop tables run against lengths we size once at init.
//!
//! ```rust
//! let heights = vec![0.0f32; 8];
//! let h = *candyworld_engine::hot!(heights, [3]);
//! assert_eq!(h, 0.0);
//!
//! let mut flags = vec![0u8; 8];
//! candyworld_engine::hot!(flags, [3] = 1);
//! assert_eq!(flags[3], 1);
//! ```

/// Checked in debug, unchecked in release.
///
/// Read:  `hot!(slice, [i])` yields `&slice[i]`.
/// Write: `hot!(slice, [i] = v)`.
#[macro_export]
macro_rules! hot {
    ($slice:expr, [$index:expr]) => {{
        #[cfg(debug_assertions)]
        {
            &$slice[$index]
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { $slice.get_unchecked($index) }
        }
    }};

    ($slice:expr, [$index:expr] = $val:expr) => {{
        #[cfg(debug_assertions)]
        {
            $slice[$index] = $val;
        }
        #[cfg(not(debug_assertions))]
        {
            unsafe { *$slice.get_unchecked_mut($index) = $val; }
        }
    }};
}
