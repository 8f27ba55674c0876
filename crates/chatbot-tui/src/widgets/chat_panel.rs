//! The floating chat panel.
//!
//! Title bar with the close button, the transcript, a divider and the
//! input row. The panel clears what is underneath it before drawing.

use chatbot_engine::ConversationController;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::line,
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
};

use super::text_input::{TextInput, TextInputState};
use super::transcript_view::TranscriptView;
use crate::layout::panel_regions;
use crate::theme::Theme;

/// Title shown in the panel's top border.
pub const PANEL_TITLE: &str = "Chatbot";

/// Close button glyph.
pub const CLOSE_GLYPH: &str = "×";

/// Panel widget combining the transcript and the draft editor.
pub struct ChatPanel<'a> {
    controller: &'a ConversationController,
    input: &'a TextInputState,
    theme: &'a Theme,
    scroll_from_bottom: usize,
    tick: usize,
}

impl<'a> ChatPanel<'a> {
    pub fn new(
        controller: &'a ConversationController,
        input: &'a TextInputState,
        theme: &'a Theme,
    ) -> Self {
        Self {
            controller,
            input,
            theme,
            scroll_from_bottom: 0,
            tick: 0,
        }
    }

    #[must_use]
    pub fn scroll_from_bottom(mut self, lines: usize) -> Self {
        self.scroll_from_bottom = lines;
        self
    }

    #[must_use]
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    fn block(&self) -> Block<'static> {
        let title = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);

        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.border_focused))
            .title(Line::from(Span::styled(format!(" {PANEL_TITLE} "), title)).left_aligned())
            .title(
                Line::from(Span::styled(
                    format!(" {CLOSE_GLYPH} "),
                    Style::default().fg(self.theme.text),
                ))
                .right_aligned(),
            )
            .style(Style::default().bg(self.theme.base))
    }
}

impl Widget for ChatPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 3 {
            return;
        }

        Clear.render(area, buf);
        self.block().render(area, buf);

        let regions = panel_regions(area);

        TranscriptView::new(self.controller, self.theme)
            .scroll_from_bottom(self.scroll_from_bottom)
            .tick(self.tick)
            .render(regions.transcript, buf);

        Paragraph::new(Span::styled(
            line::HORIZONTAL.repeat(usize::from(regions.divider.width)),
            Style::default().fg(self.theme.border),
        ))
        .render(regions.divider, buf);

        TextInput::new(self.input, self.theme).render(regions.input, buf);
    }
}
