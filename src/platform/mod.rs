//! Platform abstraction layer
//!
//! Handles the browser-facing pieces the simulation should not know about:
//! - Input events mapped to steering intents
//! - The fixed-interval difficulty ticker

pub mod input;
pub mod ticker;

pub use input::{InputState, KeyBindings};
pub use ticker::IntervalTicker;

/// Current time in milliseconds (`performance.now()` on web)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Current time in milliseconds since the first call
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}
