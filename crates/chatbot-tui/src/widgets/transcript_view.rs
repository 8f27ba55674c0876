//! Scrollable conversation view.
//!
//! ```text
//!                                       14:02
//!                             what is ratatui?
//!
//! 14:02
//! A Rust library for building terminal UIs.
//!
//! ◐ thinking…
//! ```
//!
//! Human messages are right-aligned plain text; replies are left-aligned
//! Markdown. Scrolling is measured from the bottom so new content stays in
//! view while the user has not scrolled up.

use chatbot_engine::{ConversationController, Message, Sender, TurnStatus};
use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::text::{render_markdown, wrap_text};
use crate::theme::{spinner_frame, Theme};

/// Share of the view width a single message may use, in percent.
const BUBBLE_WIDTH_PERCENT: usize = 85;

/// Build every display line of the conversation for a view `width` columns wide.
pub fn transcript_lines(
    controller: &ConversationController,
    theme: &Theme,
    width: usize,
    tick: usize,
) -> Vec<Line<'static>> {
    let bubble = (width * BUBBLE_WIDTH_PERCENT / 100).max(1);
    let muted = Style::default().fg(theme.muted);
    let mut lines: Vec<Line<'static>> = Vec::new();

    for message in controller.transcript() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        let stamp = Span::styled(timestamp(message), muted);

        match message.sender() {
            Sender::Me => {
                lines.push(Line::from(stamp).right_aligned());
                let style = Style::default().fg(theme.me);
                for row in wrap_text(message.text(), bubble) {
                    lines.push(Line::from(Span::styled(row, style)).right_aligned());
                }
                if let Some(TurnStatus::Failed { reason }) = controller.turn_status(message.turn())
                {
                    let style = Style::default().fg(theme.error);
                    for row in wrap_text(&format!("✗ no reply: {reason}"), bubble) {
                        lines.push(Line::from(Span::styled(row, style)).right_aligned());
                    }
                }
            }
            Sender::Ai => {
                lines.push(Line::from(stamp));
                lines.extend(render_markdown(message.text(), bubble, theme));
            }
        }
    }

    if controller.is_waiting() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        let label = match controller.pending_turns() {
            1 => format!("{} thinking…", spinner_frame(tick)),
            n => format!("{} thinking… ({n})", spinner_frame(tick)),
        };
        lines.push(Line::from(Span::styled(
            label,
            muted.add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn timestamp(message: &Message) -> String {
    message
        .sent_at()
        .with_timezone(&Local)
        .format("%H:%M")
        .to_string()
}

/// Widget rendering the visible window of [`transcript_lines`].
pub struct TranscriptView<'a> {
    controller: &'a ConversationController,
    theme: &'a Theme,
    scroll_from_bottom: usize,
    tick: usize,
}

impl<'a> TranscriptView<'a> {
    pub fn new(controller: &'a ConversationController, theme: &'a Theme) -> Self {
        Self {
            controller,
            theme,
            scroll_from_bottom: 0,
            tick: 0,
        }
    }

    /// Lines scrolled up from the bottom (0 = pinned to the newest line).
    #[must_use]
    pub fn scroll_from_bottom(mut self, lines: usize) -> Self {
        self.scroll_from_bottom = lines;
        self
    }

    /// Animation tick for the pending spinner.
    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = transcript_lines(
            self.controller,
            self.theme,
            usize::from(area.width),
            self.tick,
        );
        let max_scroll = lines.len().saturating_sub(usize::from(area.height));
        let top = max_scroll - self.scroll_from_bottom.min(max_scroll);

        Paragraph::new(lines)
            .style(Style::default().fg(self.theme.text))
            .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}
