//! Application state and update logic for the chat widget.
//!
//! [`App`] wraps the [`ConversationController`] with the presentation-only
//! state: cursor and history of the draft editor, scroll position, animation
//! tick and the last known screen size. The controller's draft is the
//! source of truth; the editor mirrors it after every edit.

use crate::event::{Action, Event, WHEEL_SCROLL};
use crate::layout::{close_button_area, hit, launcher_area, panel_area, panel_regions};
use crate::theme::Theme;
use crate::widgets::{transcript_lines, TextInputState};
use chatbot_engine::{ConversationController, TurnOutcome, TurnRequest};
use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use tracing::debug;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Conversation state: visibility, draft and transcript.
    pub controller: ConversationController,

    /// Cursor and history for the draft.
    pub input: TextInputState,

    pub theme: Theme,

    /// Lines scrolled up from the newest line (0 = pinned to the bottom).
    pub scroll_from_bottom: usize,

    /// Tick counter for animations.
    pub tick: usize,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Screen area of the last frame.
    pub viewport: Rect,

    /// Transcript length and visibility seen by the last scroll sync.
    seen_len: usize,
    seen_visible: bool,
}

impl App {
    /// Create a new app with an empty conversation and a closed panel.
    pub fn new(theme: Theme) -> Self {
        Self {
            controller: ConversationController::new(),
            input: TextInputState::new(),
            theme,
            scroll_from_bottom: 0,
            tick: 0,
            should_quit: false,
            viewport: Rect::default(),
            seen_len: 0,
            seen_visible: false,
        }
    }

    /// Apply a terminal event. Returns a turn to dispatch when the event submitted the draft.
    pub fn handle_event(&mut self, event: Event) -> Option<TurnRequest> {
        match event {
            Event::Key(key) => {
                let action = crate::event::key_to_action(key, self.controller.is_visible());
                self.handle_action(action)
            }
            Event::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::ScrollUp if self.controller.is_visible() => {
                        self.handle_action(Action::ScrollUp(WHEEL_SCROLL));
                    }
                    MouseEventKind::ScrollDown if self.controller.is_visible() => {
                        self.handle_action(Action::ScrollDown(WHEEL_SCROLL));
                    }
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.handle_click(mouse.column, mouse.row);
                    }
                    _ => {}
                }
                None
            }
            Event::Tick => {
                self.tick = self.tick.wrapping_add(1);
                None
            }
            Event::Resize(width, height) => {
                self.viewport = Rect::new(0, 0, width, height);
                None
            }
            Event::Paste(text) => {
                if self.controller.is_visible() {
                    self.edit(|input| input.insert_str(&text));
                }
                None
            }
        }
    }

    /// Apply an action. Returns a turn to dispatch when the action submitted the draft.
    pub fn handle_action(&mut self, action: Action) -> Option<TurnRequest> {
        let mut request = None;

        match action {
            Action::Quit => self.should_quit = true,
            Action::Open => {
                debug!("chat panel opened");
                self.controller.show();
            }
            Action::Close => {
                debug!("chat panel closed");
                self.controller.hide();
            }
            Action::Submit => {
                let submitted = self.controller.draft().to_string();
                request = self.controller.submit();
                if request.is_some() {
                    self.input.record_submission(&submitted);
                }
            }
            Action::Insert(c) => self.edit(|input| input.insert(c)),
            Action::Backspace => self.edit(TextInputState::backspace),
            Action::Delete => self.edit(TextInputState::delete),
            Action::Left => self.input.move_left(),
            Action::Right => self.input.move_right(),
            Action::Home => self.input.move_home(),
            Action::End => self.input.move_end(),
            Action::Up => {
                if self.input.is_empty() || self.input.is_browsing_history() {
                    self.edit(TextInputState::history_prev);
                } else {
                    self.scroll_up(1);
                }
            }
            Action::Down => {
                if self.input.is_browsing_history() {
                    self.edit(TextInputState::history_next);
                } else {
                    self.scroll_down(1);
                }
            }
            Action::ScrollUp(lines) => self.scroll_up(lines),
            Action::ScrollDown(lines) => self.scroll_down(lines),
            Action::None => {}
        }

        self.sync_scroll();
        request
    }

    /// Apply a finished generation call.
    pub fn apply_outcome(&mut self, outcome: TurnOutcome) {
        self.controller.resolve(outcome);
        self.sync_scroll();
    }

    /// Handle a left click at a terminal cell.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        if self.controller.is_visible() {
            if hit(close_button_area(panel_area(self.viewport)), column, row) {
                self.handle_action(Action::Close);
            }
        } else if hit(launcher_area(self.viewport), column, row) {
            self.handle_action(Action::Open);
        }
    }

    /// Run an edit on the editor and mirror the result into the controller.
    fn edit(&mut self, f: impl FnOnce(&mut TextInputState)) {
        f(&mut self.input);
        self.controller.update_draft(self.input.content());
    }

    /// Furthest the transcript can be scrolled at the current screen size.
    pub fn max_scroll(&self) -> usize {
        let area = panel_regions(panel_area(self.viewport)).transcript;
        let lines = transcript_lines(
            &self.controller,
            &self.theme,
            usize::from(area.width),
            self.tick,
        );
        lines.len().saturating_sub(usize::from(area.height))
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll_from_bottom = self
            .scroll_from_bottom
            .saturating_add(lines)
            .min(self.max_scroll());
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(lines);
    }

    /// Jump back to the newest line whenever the transcript grows or the
    /// panel becomes visible.
    fn sync_scroll(&mut self) {
        let len = self.controller.transcript().len();
        let visible = self.controller.is_visible();
        if len != self.seen_len || visible != self.seen_visible {
            self.scroll_from_bottom = 0;
        }
        self.seen_len = len;
        self.seen_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app;
    use chatbot_engine::{GenerationError, TurnStatus};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(Action::Insert(c));
        }
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_starts_closed_and_empty() {
        let app = create_test_app();
        assert!(!app.controller.is_visible());
        assert!(app.controller.transcript().is_empty());
        assert_eq!(app.controller.draft(), "");
    }

    #[test]
    fn test_open_and_close() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        assert!(app.controller.is_visible());
        app.handle_action(Action::Close);
        assert!(!app.controller.is_visible());
    }

    #[test]
    fn test_typing_updates_controller_draft() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        type_text(&mut app, "helo");
        app.handle_action(Action::Left);
        app.handle_action(Action::Insert('l'));
        assert_eq!(app.controller.draft(), "hello");

        app.handle_action(Action::Backspace);
        assert_eq!(app.controller.draft(), "helo");
    }

    #[test]
    fn test_submit_returns_request_and_clears_input() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        type_text(&mut app, "hello");

        let request = app.handle_action(Action::Submit).unwrap();
        assert_eq!(request.prompt, "hello");
        assert!(app.input.is_empty());
        assert_eq!(app.controller.draft(), "");
        assert_eq!(app.controller.transcript().len(), 1);
    }

    #[test]
    fn test_blank_submit_keeps_draft() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        type_text(&mut app, "   ");

        assert!(app.handle_action(Action::Submit).is_none());
        assert_eq!(app.input.content(), "   ");
        assert_eq!(app.controller.draft(), "   ");
        assert!(app.controller.transcript().is_empty());
    }

    #[test]
    fn test_history_recall_feeds_draft() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        type_text(&mut app, "first");
        app.handle_action(Action::Submit);

        app.handle_action(Action::Up);
        assert_eq!(app.controller.draft(), "first");
        app.handle_action(Action::Down);
        assert_eq!(app.controller.draft(), "");
    }

    #[test]
    fn test_apply_outcome_appends_reply() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        type_text(&mut app, "hello");
        let request = app.handle_action(Action::Submit).unwrap();

        app.apply_outcome(TurnOutcome {
            turn: request.turn,
            result: Ok("hi there".into()),
        });

        assert_eq!(app.controller.transcript().len(), 2);
        assert_eq!(
            app.controller.turn_status(request.turn),
            Some(&TurnStatus::Completed)
        );
    }

    #[test]
    fn test_failed_outcome_appends_nothing() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        type_text(&mut app, "hello");
        let request = app.handle_action(Action::Submit).unwrap();

        app.apply_outcome(TurnOutcome {
            turn: request.turn,
            result: Err(GenerationError::EmptyResponse),
        });

        assert_eq!(app.controller.transcript().len(), 1);
        assert!(matches!(
            app.controller.turn_status(request.turn),
            Some(TurnStatus::Failed { .. })
        ));
    }

    #[test]
    fn test_scroll_is_clamped_and_resets_on_new_message() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        for i in 0..10 {
            type_text(&mut app, &format!("message {i}"));
            let request = app.handle_action(Action::Submit).unwrap();
            app.apply_outcome(TurnOutcome {
                turn: request.turn,
                result: Ok(format!("reply {i}")),
            });
        }

        let max = app.max_scroll();
        assert!(max > 0);

        app.handle_action(Action::ScrollUp(1000));
        assert_eq!(app.scroll_from_bottom, max);

        app.handle_action(Action::ScrollDown(3));
        assert_eq!(app.scroll_from_bottom, max - 3);

        type_text(&mut app, "more");
        assert_eq!(app.scroll_from_bottom, max - 3);
        app.handle_action(Action::Submit);
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[test]
    fn test_reply_arrival_scrolls_to_bottom() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        for i in 0..10 {
            type_text(&mut app, &format!("message {i}"));
            let request = app.handle_action(Action::Submit).unwrap();
            app.apply_outcome(TurnOutcome {
                turn: request.turn,
                result: Ok(format!("reply {i}")),
            });
        }
        type_text(&mut app, "last");
        let waiting = app.handle_action(Action::Submit).unwrap();
        let failing = {
            type_text(&mut app, "doomed");
            app.handle_action(Action::Submit).unwrap()
        };

        app.handle_action(Action::ScrollUp(5));
        assert_eq!(app.scroll_from_bottom, 5);

        // No reply, no growth: the reader keeps their place
        app.apply_outcome(TurnOutcome {
            turn: failing.turn,
            result: Err(GenerationError::EmptyResponse),
        });
        assert_eq!(app.scroll_from_bottom, 5);

        app.apply_outcome(TurnOutcome {
            turn: waiting.turn,
            result: Ok("finally".into()),
        });
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[test]
    fn test_paste_inserts_into_open_draft() {
        let mut app = create_test_app();
        app.handle_event(Event::Paste("ignored".into()));
        assert_eq!(app.controller.draft(), "");

        app.handle_action(Action::Open);
        type_text(&mut app, "say: ");
        app.handle_event(Event::Paste("hello\nworld".into()));
        assert_eq!(app.controller.draft(), "say: hello world");
        assert_eq!(app.input.cursor(), 16);
    }

    #[test]
    fn test_reopening_scrolls_to_bottom() {
        let mut app = create_test_app();
        app.handle_action(Action::Open);
        app.scroll_from_bottom = 4;
        app.handle_action(Action::Close);
        app.scroll_from_bottom = 4;
        app.handle_action(Action::Open);
        assert_eq!(app.scroll_from_bottom, 0);
    }

    #[test]
    fn test_key_events_route_through_visibility() {
        let mut app = create_test_app();
        let q = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

        app.handle_event(enter);
        assert!(app.controller.is_visible());

        // 'q' types while open
        app.handle_event(q.clone());
        assert_eq!(app.controller.draft(), "q");
        assert!(!app.should_quit);

        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        app.handle_event(q);
        assert!(app.should_quit);
    }

    #[test]
    fn test_clicks_open_and_close() {
        let mut app = create_test_app();
        let launcher = launcher_area(app.viewport);
        app.handle_event(click(launcher.x + 2, launcher.y + 1));
        assert!(app.controller.is_visible());

        let close = close_button_area(panel_area(app.viewport));
        app.handle_event(click(close.x + 1, close.y));
        assert!(!app.controller.is_visible());
    }

    #[test]
    fn test_tick_advances() {
        let mut app = create_test_app();
        app.handle_event(Event::Tick);
        app.handle_event(Event::Tick);
        assert_eq!(app.tick, 2);
    }
}
