//! Headless mode for the chat widget.
//!
//! Runs the same loop as the terminal UI against a `TestBackend`. Input is
//! fed through a channel and the rendered screen is published after every
//! frame, which makes end-to-end tests possible without a TTY.

use crate::app::App;
use crate::event::{Event, EventHandler};
use crate::run_loop;
use crate::theme::Theme;
use crate::ui::buffer_text;
use chatbot_engine::{GenerationCollaborator, TurnDispatcher};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Whether the chat panel is open.
    pub visible: bool,
    /// Number of messages in the transcript.
    pub transcript_len: usize,
    /// Turns still waiting for a reply.
    pub pending_turns: usize,
    /// Whether the TUI should quit.
    pub should_quit: bool,
}

impl HeadlessState {
    fn capture(app: &App, buffer: &Buffer) -> Self {
        Self {
            screen_contents: buffer_text(buffer),
            visible: app.controller.is_visible(),
            transcript_len: app.controller.transcript().len(),
            pending_turns: app.controller.pending_turns(),
            should_quit: app.should_quit,
        }
    }
}

/// Handle to control a headless TUI instance.
pub struct HeadlessHandle {
    event_tx: mpsc::UnboundedSender<Event>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send a raw event. Returns `true` if the TUI is still running.
    pub fn send_event(&self, event: Event) -> bool {
        self.event_tx.send(event).is_ok()
    }

    /// Press a key without modifiers.
    pub fn send_key(&self, code: KeyCode) -> bool {
        self.send_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    /// Press `c` with `Ctrl` held.
    pub fn send_ctrl(&self, c: char) -> bool {
        self.send_event(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )))
    }

    /// Type every character of `text`.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|c| self.send_key(KeyCode::Char(c)))
    }

    /// Left-click a terminal cell.
    pub fn click(&self, column: u16, row: u16) -> bool {
        self.send_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.state_rx.changed()).await {
                Ok(Ok(())) => {}
                // Timed out, or the TUI stopped publishing
                Ok(Err(_)) | Err(_) => return None,
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }

    /// Check if the TUI has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
    pub theme: Theme,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 50,
            theme: Theme::default(),
        }
    }
}

/// Run the TUI in headless mode.
///
/// Must be called from within a tokio runtime. Returns a handle to drive
/// the TUI and the join handle of its task.
///
/// # Example
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(collaborator, HeadlessConfig::default());
///
/// handle.send_key(KeyCode::Enter);
/// handle.type_text("hello");
/// handle.send_key(KeyCode::Enter);
/// handle.wait_for_text("hi there", Duration::from_secs(1)).await;
///
/// handle.send_ctrl('c');
/// task.await.unwrap();
/// ```
pub fn run_tui_headless(
    collaborator: Arc<dyn GenerationCollaborator>,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (events, event_tx) = EventHandler::channel(config.tick_rate_ms);
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(collaborator, config, events, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    (HeadlessHandle { event_tx, state_rx }, task)
}

async fn run_headless_loop(
    collaborator: Arc<dyn GenerationCollaborator>,
    config: HeadlessConfig,
    mut events: EventHandler,
    state_tx: watch::Sender<HeadlessState>,
) -> std::io::Result<()> {
    let mut terminal = Terminal::new(TestBackend::new(config.width, config.height))?;
    let mut app = App::new(config.theme);
    let (dispatcher, mut outcomes) = TurnDispatcher::new(collaborator);

    run_loop(
        &mut terminal,
        &mut app,
        &mut events,
        &dispatcher,
        &mut outcomes,
        |app, buffer| {
            state_tx.send_replace(HeadlessState::capture(app, buffer));
        },
    )
    .await
}
