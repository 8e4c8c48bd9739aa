//! Wall-clock sampling behind the perf counters.
//!
//! One type over two clock sources: `js_sys::Date` inside the wasm runtime
//! (no std clock there) and `std::time::Instant` natively, so the step
//! pipeline times identically in the browser and under the test suite.

#[derive(Clone, Copy)]
pub(crate) struct PerfTimer {
    #[cfg(target_arch = "wasm32")]
    origin_ms: f64,
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
}

#[cfg(target_arch = "wasm32")]
impl PerfTimer {
    pub(crate) fn start() -> Self {
        PerfTimer {
            origin_ms: js_sys::Date::now(),
        }
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        js_sys::Date::now() - self.origin_ms
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PerfTimer {
    pub(crate) fn start() -> Self {
        PerfTimer {
            origin: std::time::Instant::now(),
        }
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
