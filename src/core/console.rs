//! Console logging on both targets.
//!
//! On wasm32 everything goes through `web_sys::console` so messages land in
//! the browser devtools next to the host's own logs. Native builds (tests,
//! benches) write to stderr instead.

#[cfg(target_arch = "wasm32")]
pub(crate) fn log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn log(msg: &str) {
    eprintln!("[candyworld] {msg}");
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn warn(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn warn(msg: &str) {
    eprintln!("[candyworld] WARN: {msg}");
}
