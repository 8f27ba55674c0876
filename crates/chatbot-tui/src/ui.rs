//! Whole-screen rendering.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, Frame};

use crate::app::App;
use crate::layout::{launcher_area, panel_area};
use crate::widgets::{hints_for, ChatPanel, FooterHints, Launcher};

/// Draw one frame, recording the screen size for hit-testing and scrolling.
pub fn draw(app: &mut App, frame: &mut Frame<'_>) {
    app.viewport = frame.area();
    render(app, frame.area(), frame.buffer_mut());
}

/// Render the widget onto `buf`: the launcher or the open panel, plus key hints.
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let footer = Rect::new(area.x, area.bottom() - 1, area.width, 1);
    FooterHints::new(hints_for(app.controller.is_visible()), &app.theme).render(footer, buf);

    if app.controller.is_visible() {
        ChatPanel::new(&app.controller, &app.input, &app.theme)
            .scroll_from_bottom(app.scroll_from_bottom)
            .tick(app.tick)
            .render(panel_area(area), buf);
    } else {
        Launcher::new(&app.theme).render(launcher_area(area), buf);
    }
}

/// Plain text of a rendered buffer, one line per row with trailing spaces trimmed.
pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut rows = Vec::with_capacity(usize::from(area.height));

    for y in area.top()..area.bottom() {
        let row: String = (area.left()..area.right())
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        rows.push(row.trim_end_matches(' ').to_string());
    }

    rows.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::test_utils::{create_test_app, render_app_to_string};
    use chatbot_engine::TurnOutcome;

    #[test]
    fn test_closed_screen_shows_launcher_only() {
        let app = create_test_app();
        let screen = render_app_to_string(&app);
        assert!(screen.contains("💬"));
        assert!(screen.contains("[Enter] open chat"));
        assert!(!screen.contains("Chatbot"));
    }

    #[test]
    fn test_open_screen_shows_panel() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        let screen = render_app_to_string(&app);
        assert!(screen.contains("Chatbot"));
        assert!(screen.contains("×"));
        assert!(screen.contains("Type your message..."));
        assert!(screen.contains("[Esc] close"));
        assert!(!screen.contains("💬"));
    }

    #[test]
    fn test_conversation_on_screen() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        for c in "hello".chars() {
            app.handle_action(Action::Insert(c));
        }
        let request = app.handle_action(Action::Submit).unwrap();

        let screen = render_app_to_string(&app);
        assert!(screen.contains("hello"));
        assert!(screen.contains("thinking…"));

        app.apply_outcome(TurnOutcome {
            turn: request.turn,
            result: Ok("# Hi there\n\nHow can I *help*?".into()),
        });
        let screen = render_app_to_string(&app);
        assert!(screen.contains("Hi there"));
        assert!(screen.contains("How can I help?"));
        assert!(!screen.contains("# Hi"));
        assert!(!screen.contains("thinking…"));
    }

    #[test]
    fn test_transcript_survives_close_and_reopen() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        app.handle_action(Action::Insert('x'));
        app.handle_action(Action::Submit);
        app.handle_action(Action::Close);
        app.handle_action(Action::Open);

        let screen = render_app_to_string(&app);
        assert_eq!(app.controller.transcript().len(), 1);
        assert!(screen.contains('x'));
    }

    #[test]
    fn test_zero_area_is_ignored() {
        let app = create_test_app();
        let mut buffer = Buffer::empty(Rect::new(0, 0, 0, 0));
        render(&app, Rect::new(0, 0, 0, 0), &mut buffer);
    }
}
