//! Theme components for the TUI.
//!
//! - [`Theme`] - Colour palette (crimson / ember)
//! - [`SPINNER_FRAMES`] - Animation frames for the pending indicator

mod colors;

pub use colors::Theme;

/// Frames cycled by the "thinking" indicator, one per tick.
pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Spinner frame for a tick counter.
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}
