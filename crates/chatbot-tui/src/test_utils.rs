//! Test utilities for chatbot-tui widget and integration testing.
//!
//! Helpers for creating test terminals and apps, rendering to strings, and
//! canned generation collaborators.

use crate::app::App;
use crate::theme::Theme;
use async_trait::async_trait;
use chatbot_engine::{GenerationCollaborator, GenerationError};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test terminal with the default dimensions (80x24).
pub fn create_test_terminal() -> Terminal<TestBackend> {
    create_test_terminal_sized(TEST_WIDTH, TEST_HEIGHT)
}

/// Create a test terminal with custom dimensions.
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Create a test app sized to the default test terminal.
pub fn create_test_app() -> App {
    let mut app = App::new(Theme::default());
    app.viewport = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    app
}

/// Convert a buffer to a string representation.
///
/// Trailing whitespace is trimmed from every row.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    crate::ui::buffer_text(buffer)
}

/// Render the whole app at the default size and return it as a string.
pub fn render_app_to_string(app: &App) -> String {
    let area = Rect::new(0, 0, TEST_WIDTH, TEST_HEIGHT);
    let mut buffer = Buffer::empty(area);
    crate::ui::render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

/// Replies with the prompt it was given.
pub struct EchoCollaborator;

#[async_trait]
impl GenerationCollaborator for EchoCollaborator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        Ok(format!("echo: {prompt}"))
    }
}

/// Fails every call with a quota error.
pub struct FailingCollaborator;

#[async_trait]
impl GenerationCollaborator for FailingCollaborator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Status {
            status: 429,
            message: "quota exceeded".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_terminal() {
        let terminal = create_test_terminal();
        let size = terminal.size().unwrap();
        assert_eq!(size.width, TEST_WIDTH);
        assert_eq!(size.height, TEST_HEIGHT);
    }

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert_eq!(app.viewport.width, TEST_WIDTH);
        assert!(!app.controller.is_visible());
    }

    #[test]
    fn test_buffer_to_string() {
        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", ratatui::style::Style::default());
        buffer.set_string(0, 1, "World", ratatui::style::Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\nWorld\n");
    }
}
