//! chatbot-tui: a floating chat widget for the terminal
//!
//! This crate provides the terminal front end for the chatbot, including:
//! - The launcher button and the expandable chat panel
//! - Markdown rendering of replies
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod layout;
mod text;
mod theme;
#[cfg(test)]
pub mod test_utils;
mod ui;
mod widgets;

pub use app::App;
pub use chatbot_engine;
pub use event::{Action, Event, EventHandler};
pub use theme::Theme;

use chatbot_engine::{GenerationCollaborator, TurnDispatcher, TurnOutcome};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    Terminal,
};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Tick rate of the interactive UI (4 Hz).
const TICK_RATE_MS: u64 = 250;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// Run the chat widget in the terminal.
///
/// Sets up the terminal, runs the event loop until the user quits and
/// restores the terminal on exit. Every submitted message is answered by
/// `collaborator` on a background task.
pub async fn run_tui(
    collaborator: Arc<dyn GenerationCollaborator>,
    theme: Theme,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(theme);
    let mut events = EventHandler::new(TICK_RATE_MS);
    let (dispatcher, mut outcomes) = TurnDispatcher::new(collaborator);

    info!("chat session started");
    let result = run_loop(
        &mut terminal,
        &mut app,
        &mut events,
        &dispatcher,
        &mut outcomes,
        |_, _| {},
    )
    .await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    info!(
        messages = app.controller.transcript().len(),
        pending = app.controller.pending_turns(),
        "chat session ended"
    );

    result.map_err(Into::into)
}

/// Event loop shared by the terminal UI and headless mode.
///
/// Redraws after every event or completed turn and hands each rendered
/// buffer to `on_frame`. Stops once the app asks to quit or the event
/// source closes.
pub(crate) async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventHandler,
    dispatcher: &TurnDispatcher,
    outcomes: &mut mpsc::UnboundedReceiver<TurnOutcome>,
    mut on_frame: impl FnMut(&App, &Buffer),
) -> io::Result<()> {
    loop {
        {
            let frame = terminal.draw(|frame| ui::draw(app, frame))?;
            on_frame(app, frame.buffer);
        }

        if app.should_quit {
            break;
        }

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    debug!("event source closed");
                    break;
                };
                if let Some(request) = app.handle_event(event) {
                    debug!(turn = %request.turn, "dispatching turn");
                    dispatcher.dispatch(request);
                }
            }
            Some(outcome) = outcomes.recv() => {
                app.apply_outcome(outcome);
            }
        }
    }

    Ok(())
}

/// Returns the version of the chatbot-tui crate.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
