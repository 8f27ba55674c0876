//! Running turn requests in the background.
//!
//! The dispatcher spawns one tokio task per [`TurnRequest`] and sends the
//! finished [`TurnOutcome`] down a channel. Whoever owns the
//! [`ConversationController`](crate::ConversationController) drains that
//! channel and calls `resolve`, which keeps every state mutation on the
//! owner's side.
//!
//! There is no queue, limit or cancellation: every request runs to
//! completion, and outcomes arrive in whatever order they finish.

use crate::controller::{TurnOutcome, TurnRequest};
use crate::generation::GenerationCollaborator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Spawns generation calls and reports their outcomes.
#[derive(Clone)]
pub struct TurnDispatcher {
    collaborator: Arc<dyn GenerationCollaborator>,
    tx: mpsc::UnboundedSender<TurnOutcome>,
}

impl TurnDispatcher {
    /// Create a dispatcher and the receiver its outcomes arrive on.
    pub fn new(
        collaborator: Arc<dyn GenerationCollaborator>,
    ) -> (Self, mpsc::UnboundedReceiver<TurnOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { collaborator, tx }, rx)
    }

    /// Start generating a reply for `request`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, request: TurnRequest) -> JoinHandle<()> {
        let collaborator = Arc::clone(&self.collaborator);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let TurnRequest { turn, prompt } = request;
            let result = collaborator.generate(&prompt).await;
            if tx.send(TurnOutcome { turn, result }).is_err() {
                debug!(%turn, "session closed before reply arrived");
            }
        })
    }
}

impl std::fmt::Debug for TurnDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnDispatcher").finish_non_exhaustive()
    }
}
