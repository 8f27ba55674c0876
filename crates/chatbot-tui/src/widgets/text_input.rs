//! Single-line draft editor with submission history.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// Prompt drawn in front of the draft.
pub const PROMPT: &str = "> ";

/// Shown when the draft is empty.
pub const PLACEHOLDER: &str = "Type your message...";

/// Editing state for the draft: content, cursor and recall history.
///
/// The cursor is a character index, never a byte offset.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    content: String,
    cursor: usize,
    /// Earlier submissions, oldest first.
    history: Vec<String>,
    /// Position while browsing history, counted back from the newest entry.
    history_index: Option<usize>,
    /// Draft saved when history browsing started.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty text input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether an earlier submission is currently recalled.
    pub fn is_browsing_history(&self) -> bool {
        self.history_index.is_some()
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    ///
    /// The draft is a single line, so line breaks become spaces.
    pub fn insert_str(&mut self, s: &str) {
        let flat: String = s
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect();
        let at = self.byte_index(self.cursor);
        self.content.insert_str(at, &flat);
        self.cursor += flat.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Record a submitted draft in history and clear the editor.
    pub fn record_submission(&mut self, submitted: &str) {
        if !submitted.trim().is_empty() {
            self.history.push(submitted.to_string());
        }
        self.content.clear();
        self.cursor = 0;
        self.history_index = None;
        self.saved_input.clear();
    }

    /// Recall the previous (older) submission.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let index = match self.history_index {
            None => {
                self.saved_input = self.content.clone();
                0
            }
            Some(index) if index + 1 < self.history.len() => index + 1,
            Some(_) => return,
        };

        self.history_index = Some(index);
        self.content = self.history[self.history.len() - 1 - index].clone();
        self.move_end();
    }

    /// Move towards newer submissions, restoring the saved draft at the end.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.history_index = None;
                self.content = std::mem::take(&mut self.saved_input);
                self.move_end();
            }
            Some(index) => {
                self.history_index = Some(index - 1);
                self.content = self.history[self.history.len() - index].clone();
                self.move_end();
            }
        }
    }
}

/// Input row widget: prompt, draft (or placeholder) and the send hint.
pub struct TextInput<'a> {
    state: &'a TextInputState,
    theme: &'a Theme,
}

impl<'a> TextInput<'a> {
    pub fn new(state: &'a TextInputState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Draft spans, scrolled horizontally so the cursor stays in `width` columns.
    fn draft_spans(&self, width: usize) -> Vec<Span<'static>> {
        let text = Style::default().fg(self.theme.text);
        let cursor_style = text.add_modifier(Modifier::REVERSED);

        if self.state.is_empty() {
            return vec![
                Span::styled(" ", cursor_style),
                Span::styled(PLACEHOLDER, Style::default().fg(self.theme.muted)),
            ];
        }

        let chars: Vec<char> = self.state.content().chars().collect();
        let cursor = self.state.cursor().min(chars.len());

        // Leave room for the cursor cell at the end
        let mut start = 0;
        while start < cursor {
            let visible: String = chars[start..cursor].iter().collect();
            if visible.width() < width {
                break;
            }
            start += 1;
        }

        let before: String = chars[start..cursor].iter().collect();
        let under = chars.get(cursor).map_or(" ".to_string(), char::to_string);
        let after: String = chars.get(cursor + 1..).unwrap_or_default().iter().collect();

        vec![
            Span::styled(before, text),
            Span::styled(under, cursor_style),
            Span::styled(after, text),
        ]
    }
}

/// Label of the send hint.
const SEND_HINT: &str = " Send ";

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let hint_width = u16::try_from(SEND_HINT.width()).unwrap_or(u16::MAX);
        let prompt_width = u16::try_from(PROMPT.width()).unwrap_or(u16::MAX);
        let show_hint = area.width > hint_width + prompt_width + 4;

        let draft_width = if show_hint {
            area.width - hint_width - 1
        } else {
            area.width
        };
        let draft_area = Rect::new(area.x, area.y, draft_width, 1);

        let mut spans = vec![Span::styled(
            PROMPT,
            Style::default().fg(self.theme.accent),
        )];
        spans.extend(self.draft_spans(usize::from(draft_width.saturating_sub(prompt_width))));
        Paragraph::new(Line::from(spans)).render(draft_area, buf);

        if show_hint {
            let hint_area = Rect::new(area.right() - hint_width, area.y, hint_width, 1);
            let style = if self.state.content().trim().is_empty() {
                Style::default().fg(self.theme.muted).bg(self.theme.surface)
            } else {
                Style::default()
                    .fg(self.theme.on_accent)
                    .bg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            };
            Paragraph::new(Span::styled(SEND_HINT, style)).render(hint_area, buf);
        }
    }
}
