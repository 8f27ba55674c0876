//! Markdown rendering using pulldown-cmark.
//!
//! Model replies are rendered as Markdown; the user's own messages never go
//! through here.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::theme::Theme;

use super::styles::MarkdownStyles;
use super::wrap::wrap_lines;

/// Render markdown text to styled ratatui Lines no wider than `width`.
///
/// Block elements are separated by a single blank line; leading and
/// trailing blank lines are never produced.
pub fn render_markdown(input: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(input, options);
    let mut renderer = MarkdownRenderer::new(MarkdownStyles::from_theme(theme), width);
    renderer.run(parser);
    wrap_lines(renderer.finish(), width)
}

/// Internal renderer that processes pulldown-cmark events.
struct MarkdownRenderer {
    lines: Vec<Line<'static>>,
    styles: MarkdownStyles,
    width: usize,
    /// Stack of active styles for nested formatting.
    style_stack: Vec<Style>,
    current_spans: Vec<Span<'static>>,
    /// One entry per open list: the next number for ordered lists.
    list_stack: Vec<Option<u64>>,
    /// Targets of open links, `None` when the text already is the target.
    link_targets: Vec<Option<String>>,
    in_code_block: bool,
    in_blockquote: bool,
    /// List marker waiting for the item's first text.
    pending_list_marker: Option<String>,
    /// Task list checkbox state (Some(checked) if in task item).
    task_checkbox: Option<bool>,
}

impl MarkdownRenderer {
    fn new(styles: MarkdownStyles, width: usize) -> Self {
        Self {
            lines: Vec::new(),
            styles,
            width,
            style_stack: Vec::new(),
            current_spans: Vec::new(),
            list_stack: Vec::new(),
            link_targets: Vec::new(),
            in_code_block: false,
            in_blockquote: false,
            pending_list_marker: None,
            task_checkbox: None,
        }
    }

    fn run<'a>(&mut self, parser: impl Iterator<Item = Event<'a>>) {
        for event in parser {
            self.handle_event(event);
        }
        self.flush_line();
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }

    #[allow(clippy::too_many_lines)]
    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.flush_line();
                self.push_blank();
                let style = self.heading_style(level);
                self.style_stack.push(style);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.style_stack.pop();
                self.push_blank();
            }

            Event::Start(Tag::Emphasis) => {
                self.style_stack.push(self.styles.emphasis);
            }
            Event::Start(Tag::Strong) => {
                self.style_stack.push(self.styles.strong);
            }
            Event::Start(Tag::Strikethrough) => {
                self.style_stack.push(self.styles.strikethrough);
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough) => {
                self.style_stack.pop();
            }

            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            }) => {
                self.style_stack.push(self.styles.link);
                let target = match link_type {
                    LinkType::Autolink | LinkType::Email => None,
                    _ if dest_url.is_empty() => None,
                    _ => Some(dest_url.to_string()),
                };
                self.link_targets.push(target);
            }
            Event::End(TagEnd::Link) => {
                self.style_stack.pop();
                if let Some(Some(target)) = self.link_targets.pop() {
                    self.current_spans
                        .push(Span::styled(format!(" ({target})"), self.styles.link_target));
                }
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_line();
                if self.pending_list_marker.is_some() {
                    // Item opens with code: the marker gets a line of its own
                    self.open_line();
                    self.flush_line();
                } else {
                    self.push_blank();
                }
                if let CodeBlockKind::Fenced(info) = kind {
                    if let Some(language) = info.split_whitespace().next() {
                        self.open_line();
                        self.current_spans
                            .push(Span::styled(language.to_string(), self.styles.code_label));
                        self.flush_line();
                    }
                }
                self.in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                self.flush_line();
                self.in_code_block = false;
                self.push_blank();
            }

            Event::Start(Tag::List(start)) => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.push_blank();
                }
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.push_blank();
                }
            }

            Event::Start(Tag::Item) => {
                self.flush_line();
                let indent = "  ".repeat(self.list_stack.len().saturating_sub(1));
                let marker = match self.list_stack.last_mut() {
                    Some(Some(next)) => {
                        let marker = format!("{next}. ");
                        *next += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.pending_list_marker = Some(format!("{indent}{marker}"));
            }
            Event::End(TagEnd::Item) => {
                self.flush_line();
                self.pending_list_marker = None;
                self.task_checkbox = None;
            }

            Event::TaskListMarker(checked) => {
                self.task_checkbox = Some(checked);
            }

            Event::Start(Tag::BlockQuote) => {
                self.flush_line();
                self.push_blank();
                self.in_blockquote = true;
            }
            Event::End(TagEnd::BlockQuote) => {
                self.flush_line();
                self.in_blockquote = false;
                self.push_blank();
            }

            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                // Tight spacing inside lists
                if self.list_stack.is_empty() && !self.in_blockquote {
                    self.push_blank();
                }
            }

            Event::Rule => {
                self.flush_line();
                self.push_blank();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(self.width.clamp(3, 40)),
                    self.styles.rule,
                )));
                self.push_blank();
            }

            Event::Text(text) => {
                self.add_text(&text);
            }

            Event::Code(code) => {
                self.open_line();
                self.current_spans
                    .push(Span::styled(format!("`{code}`"), self.styles.code));
            }

            Event::SoftBreak => {
                self.add_text(" ");
            }
            Event::HardBreak => {
                self.flush_line();
            }

            Event::Start(
                Tag::Paragraph
                | Tag::Image { .. }
                | Tag::Table(_)
                | Tag::TableHead
                | Tag::TableRow
                | Tag::TableCell
                | Tag::FootnoteDefinition(_)
                | Tag::MetadataBlock(_)
                | Tag::HtmlBlock,
            )
            | Event::End(
                TagEnd::Image
                | TagEnd::Table
                | TagEnd::TableHead
                | TagEnd::TableRow
                | TagEnd::TableCell
                | TagEnd::FootnoteDefinition
                | TagEnd::MetadataBlock(_)
                | TagEnd::HtmlBlock,
            )
            | Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_) => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.open_line();
                self.current_spans
                    .push(Span::styled(format!("  {line}"), self.styles.code_block));
                self.flush_line();
            }
            return;
        }

        self.open_line();
        let style = self.current_style();
        self.current_spans.push(Span::styled(text.to_string(), style));
    }

    /// Lead-in of a fresh line: the quote bar, then the pending list marker
    /// (and checkbox) or the indent of the enclosing items.
    fn open_line(&mut self) {
        if !self.current_spans.is_empty() {
            return;
        }

        if self.in_blockquote {
            self.current_spans
                .push(Span::styled("│ ".to_string(), self.styles.blockquote));
        }

        if let Some(marker) = self.pending_list_marker.take() {
            self.current_spans
                .push(Span::styled(marker, self.styles.list_marker));
            if let Some(checked) = self.task_checkbox.take() {
                let checkbox = if checked { "[x] " } else { "[ ] " };
                self.current_spans
                    .push(Span::styled(checkbox, self.styles.list_marker));
            }
        } else if !self.list_stack.is_empty() {
            self.current_spans
                .push(Span::raw("  ".repeat(self.list_stack.len())));
        }
    }

    fn current_style(&self) -> Style {
        self.style_stack
            .iter()
            .fold(self.styles.text, |style, s| style.patch(*s))
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        match level {
            HeadingLevel::H1 => self.styles.h1,
            HeadingLevel::H2 => self.styles.h2,
            _ => self.styles.h3,
        }
    }

    fn flush_line(&mut self) {
        if !self.current_spans.is_empty() {
            let spans = std::mem::take(&mut self.current_spans);
            self.lines.push(Line::from(spans));
        }
    }

    /// Separate blocks by exactly one blank line.
    fn push_blank(&mut self) {
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }
}
