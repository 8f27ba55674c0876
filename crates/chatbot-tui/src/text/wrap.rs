//! Text wrapping utilities for ratatui Lines.
//!
//! Widths are measured in terminal cells (unicode-width), so wide
//! characters such as CJK or emoji take two columns.

use ratatui::text::{Line, Span};
use std::borrow::Cow;

/// Wrap a plain text string to the specified width.
///
/// Embedded newlines always start a new line; blank input lines are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.lines().map(ToString::to_string).collect();
    }

    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(textwrap::wrap(paragraph, width).into_iter().map(Cow::into_owned));
    }
    out
}

/// Wrap a vector of Lines to fit within the specified width.
///
/// Styling and alignment are preserved on every wrapped piece.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines;
    }

    lines
        .into_iter()
        .flat_map(|line| wrap_line(line, width))
        .collect()
}

/// Wrap a single Line to fit within the specified width.
fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    if line.width() <= width {
        return vec![line];
    }

    let styled: Vec<(char, ratatui::style::Style)> = line
        .spans
        .iter()
        .flat_map(|span| span.content.chars().map(move |ch| (ch, span.style)))
        .collect();
    let plain: String = styled.iter().map(|(ch, _)| ch).collect();

    let mut result = Vec::new();
    let mut next = 0;

    for row in textwrap::wrap(&plain, width) {
        // textwrap drops the whitespace it breaks on
        while next < styled.len() && styled[next].0.is_whitespace() && !row.starts_with(styled[next].0)
        {
            next += 1;
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        for _ in row.chars() {
            let Some(&(ch, style)) = styled.get(next) else {
                break;
            };
            next += 1;
            match spans.last_mut() {
                Some(last) if last.style == style => last.content.to_mut().push(ch),
                _ => spans.push(Span::styled(ch.to_string(), style)),
            }
        }

        let mut wrapped = Line::from(spans);
        wrapped.style = line.style;
        wrapped.alignment = line.alignment;
        result.push(wrapped);
    }

    if result.is_empty() {
        result.push(Line::default());
    }

    result
}
