//! Key hints along the bottom edge of the screen.
//!
//! Format: `[Enter] open chat │ [q] quit`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

/// A single keybinding hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The key or key combination (e.g., "Esc", "Ctrl+C").
    pub key: &'static str,
    /// The action description (e.g., "close", "quit").
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Hints while only the launcher is shown.
pub const CLOSED_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "open chat"),
    KeyHint::new("q", "quit"),
];

/// Hints while the panel is open.
pub const OPEN_HINTS: &[KeyHint] = &[
    KeyHint::new("Enter", "send"),
    KeyHint::new("Esc", "close"),
    KeyHint::new("PgUp/PgDn", "scroll"),
    KeyHint::new("Ctrl+C", "quit"),
];

/// Hint line for the current visibility.
pub fn hints_for(visible: bool) -> &'static [KeyHint] {
    if visible {
        OPEN_HINTS
    } else {
        CLOSED_HINTS
    }
}

/// Footer hints widget.
pub struct FooterHints<'a> {
    hints: &'a [KeyHint],
    theme: &'a Theme,
}

impl<'a> FooterHints<'a> {
    pub fn new(hints: &'a [KeyHint], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for FooterHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let muted = Style::default().fg(self.theme.muted);
        let mut spans = Vec::new();

        for (i, hint) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", muted));
            }
            spans.push(Span::styled("[", muted));
            spans.push(Span::styled(hint.key, Style::default().fg(self.theme.accent)));
            spans.push(Span::styled("] ", muted));
            spans.push(Span::styled(hint.action, Style::default().fg(self.theme.subtext)));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
