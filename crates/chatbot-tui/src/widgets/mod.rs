//! UI widgets for the TUI.
//!
//! - [`Launcher`] - Bubble shown while the panel is closed
//! - [`ChatPanel`] - The floating panel (title bar, transcript, input row)
//! - `TranscriptView` - Scrollable conversation
//! - `TextInput` - Draft editor row
//! - [`FooterHints`] - Bottom keybinding hints

mod chat_panel;
mod footer_hints;
mod launcher;
mod text_input;
mod transcript_view;

pub use chat_panel::ChatPanel;
pub use footer_hints::{hints_for, FooterHints};
pub use launcher::Launcher;
pub use text_input::TextInputState;
pub use transcript_view::transcript_lines;
