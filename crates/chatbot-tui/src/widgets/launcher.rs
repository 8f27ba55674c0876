//! Launcher bubble shown while the panel is closed.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, BorderType, Paragraph, Widget},
};

use crate::theme::Theme;

/// Icon inside the bubble.
pub const LAUNCHER_ICON: &str = "💬";

/// A small rounded bubble with the chat icon.
pub struct Launcher<'a> {
    theme: &'a Theme,
}

impl<'a> Launcher<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Launcher<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.accent));

        Paragraph::new(LAUNCHER_ICON)
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
    }
}
