//! Conversation state and its update protocol.
//!
//! [`ConversationController`] owns the panel visibility, the draft and the
//! transcript. Every mutation goes through it, on one logical thread, so no
//! locking is needed. Generation itself happens elsewhere: [`submit`] hands
//! back a [`TurnRequest`] for the caller to run, and the eventual
//! [`TurnOutcome`] is fed back through [`resolve`].
//!
//! Replies are appended in the order they resolve, not the order they were
//! asked. Each reply carries the [`TurnId`] of its question, so the pairing
//! stays recoverable even when two answers cross.
//!
//! [`submit`]: ConversationController::submit
//! [`resolve`]: ConversationController::resolve

use crate::generation::GenerationError;
use crate::message::{Message, TurnId};
use crate::transcript::Transcript;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A prompt waiting to be sent to the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    /// Turn the prompt belongs to.
    pub turn: TurnId,
    /// The submitted draft, untrimmed.
    pub prompt: String,
}

/// The result of running a [`TurnRequest`].
#[derive(Debug)]
pub struct TurnOutcome {
    /// Turn the result belongs to.
    pub turn: TurnId,
    /// Reply text, or why there is none.
    pub result: Result<String, GenerationError>,
}

/// Lifecycle of one generation call.
///
/// `Completed` and `Failed` are terminal; nothing moves a turn out of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStatus {
    /// Request issued, no answer yet.
    Pending,
    /// Reply appended to the transcript.
    Completed,
    /// No reply will come.
    Failed {
        /// Rendered error from the collaborator.
        reason: String,
    },
}

impl TurnStatus {
    /// Whether the turn can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TurnStatus::Pending)
    }
}

/// Owner of all conversation state.
#[derive(Debug, Default)]
pub struct ConversationController {
    visible: bool,
    draft: String,
    transcript: Transcript,
    turns: BTreeMap<TurnId, TurnStatus>,
    last_turn: u64,
}

impl ConversationController {
    /// Create a controller with a hidden panel and nothing said.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the chat panel is open.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip panel visibility.
    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
        debug!(visible = self.visible, "toggled panel");
    }

    /// Open the panel.
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Close the panel. In-flight requests keep running.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// The unsent input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft verbatim.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// The conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Submit the draft.
    ///
    /// A draft that is empty after trimming is ignored: nothing is appended,
    /// nothing is requested and the draft is left as it was. Otherwise the
    /// draft is appended verbatim as a `"me"` message, cleared, and returned
    /// as a request for the caller to dispatch.
    pub fn submit(&mut self) -> Option<TurnRequest> {
        if self.draft.trim().is_empty() {
            return None;
        }

        let prompt = std::mem::take(&mut self.draft);
        self.last_turn += 1;
        let turn = TurnId(self.last_turn);

        self.transcript.push(Message::me(prompt.clone(), turn));
        self.turns.insert(turn, TurnStatus::Pending);
        info!(%turn, chars = prompt.chars().count(), "submitted turn");

        Some(TurnRequest { turn, prompt })
    }

    /// Apply the outcome of a generation call.
    ///
    /// Success appends a `"AI"` message at the end of the transcript. Failure
    /// appends nothing and marks the turn failed. Outcomes for unknown or
    /// already finished turns are dropped. Returns whether the outcome was
    /// applied.
    pub fn resolve(&mut self, outcome: TurnOutcome) -> bool {
        let TurnOutcome { turn, result } = outcome;

        let Some(status) = self.turns.get_mut(&turn) else {
            debug!(%turn, "dropping outcome for unknown turn");
            return false;
        };
        if status.is_terminal() {
            debug!(%turn, ?status, "dropping outcome for finished turn");
            return false;
        }

        match result {
            Ok(text) => {
                *status = TurnStatus::Completed;
                self.transcript.push(Message::ai(text, turn));
                info!(%turn, "turn completed");
            }
            Err(err) => {
                warn!(%turn, error = %err, "generation failed");
                *status = TurnStatus::Failed {
                    reason: err.to_string(),
                };
            }
        }
        true
    }

    /// Status of a turn, if it exists.
    pub fn turn_status(&self, turn: TurnId) -> Option<&TurnStatus> {
        self.turns.get(&turn)
    }

    /// All turns in submission order with their status.
    pub fn turns(&self) -> impl Iterator<Item = (TurnId, &TurnStatus)> {
        self.turns.iter().map(|(turn, status)| (*turn, status))
    }

    /// Number of requests still waiting for an answer.
    pub fn pending_turns(&self) -> usize {
        self.turns
            .values()
            .filter(|s| matches!(s, TurnStatus::Pending))
            .count()
    }

    /// Whether any request is outstanding.
    pub fn is_waiting(&self) -> bool {
        self.pending_turns() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use std::collections::HashSet;

    fn ok(turn: TurnId, text: &str) -> TurnOutcome {
        TurnOutcome {
            turn,
            result: Ok(text.to_string()),
        }
    }

    fn texts(controller: &ConversationController) -> Vec<(&str, Sender)> {
        controller
            .transcript()
            .iter()
            .map(|m| (m.text(), m.sender()))
            .collect()
    }

    #[test]
    fn test_new_controller_is_empty_and_hidden() {
        let controller = ConversationController::new();
        assert!(!controller.is_visible());
        assert_eq!(controller.draft(), "");
        assert!(controller.transcript().is_empty());
        assert!(!controller.is_waiting());
    }

    #[test]
    fn test_toggle_visibility_leaves_state_alone() {
        let mut controller = ConversationController::new();
        controller.update_draft("typing");

        controller.toggle_visibility();
        assert!(controller.is_visible());
        controller.toggle_visibility();
        assert!(!controller.is_visible());

        assert_eq!(controller.draft(), "typing");
        assert!(controller.transcript().is_empty());
    }

    #[test]
    fn test_show_and_hide() {
        let mut controller = ConversationController::new();
        controller.show();
        controller.show();
        assert!(controller.is_visible());
        controller.hide();
        assert!(!controller.is_visible());
    }

    #[test]
    fn test_update_draft_is_idempotent() {
        let mut once = ConversationController::new();
        once.update_draft("same");

        let mut twice = ConversationController::new();
        twice.update_draft("same");
        twice.update_draft("same");

        assert_eq!(once.draft(), twice.draft());
    }

    #[test]
    fn test_hello_scenario() {
        let mut controller = ConversationController::new();
        controller.update_draft("hello");

        let request = controller.submit().expect("non-empty draft submits");
        assert_eq!(request.prompt, "hello");
        assert_eq!(controller.draft(), "");
        assert_eq!(texts(&controller), vec![("hello", Sender::Me)]);
        assert_eq!(controller.turn_status(request.turn), Some(&TurnStatus::Pending));

        assert!(controller.resolve(ok(request.turn, "hi there")));
        assert_eq!(
            texts(&controller),
            vec![("hello", Sender::Me), ("hi there", Sender::Ai)]
        );
        assert_eq!(
            controller.turn_status(request.turn),
            Some(&TurnStatus::Completed)
        );
    }

    #[test]
    fn test_blank_drafts_are_ignored() {
        for blank in ["", " ", "\t\n", "   "] {
            let mut controller = ConversationController::new();
            controller.update_draft(blank);

            assert!(controller.submit().is_none());
            assert!(controller.transcript().is_empty());
            assert_eq!(controller.draft(), blank);
            assert_eq!(controller.turns().count(), 0);
        }
    }

    #[test]
    fn test_submitted_text_is_untrimmed() {
        let mut controller = ConversationController::new();
        controller.update_draft("  spaced out  ");

        let request = controller.submit().unwrap();
        assert_eq!(request.prompt, "  spaced out  ");
        assert_eq!(controller.transcript().messages()[0].text(), "  spaced out  ");
    }

    #[test]
    fn test_crossing_replies_append_in_resolution_order() {
        let mut controller = ConversationController::new();

        controller.update_draft("a");
        let a = controller.submit().unwrap();
        controller.update_draft("b");
        let b = controller.submit().unwrap();
        assert_eq!(controller.pending_turns(), 2);

        controller.resolve(ok(b.turn, "reply-b"));
        controller.resolve(ok(a.turn, "reply-a"));

        assert_eq!(
            texts(&controller),
            vec![
                ("a", Sender::Me),
                ("b", Sender::Me),
                ("reply-b", Sender::Ai),
                ("reply-a", Sender::Ai),
            ]
        );

        let transcript = controller.transcript();
        assert_eq!(transcript.reply_to(a.turn).map(Message::text), Some("reply-a"));
        assert_eq!(transcript.reply_to(b.turn).map(Message::text), Some("reply-b"));
    }

    #[test]
    fn test_failed_turn_appends_nothing() {
        let mut controller = ConversationController::new();
        controller.update_draft("will fail");
        let request = controller.submit().unwrap();

        let applied = controller.resolve(TurnOutcome {
            turn: request.turn,
            result: Err(GenerationError::EmptyResponse),
        });

        assert!(applied);
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(
            controller.turn_status(request.turn),
            Some(&TurnStatus::Failed {
                reason: "response contained no text".into()
            })
        );
        assert!(!controller.is_waiting());

        // Later turns are unaffected.
        controller.update_draft("again");
        let next = controller.submit().unwrap();
        controller.resolve(ok(next.turn, "fine"));
        assert_eq!(controller.transcript().len(), 3);
    }

    #[test]
    fn test_terminal_states_absorb() {
        let mut controller = ConversationController::new();
        controller.update_draft("q");
        let request = controller.submit().unwrap();

        assert!(controller.resolve(ok(request.turn, "first")));
        assert!(!controller.resolve(ok(request.turn, "second")));
        assert!(!controller.resolve(TurnOutcome {
            turn: request.turn,
            result: Err(GenerationError::EmptyResponse),
        }));

        assert_eq!(controller.transcript().len(), 2);
        assert_eq!(
            controller.turn_status(request.turn),
            Some(&TurnStatus::Completed)
        );
    }

    #[test]
    fn test_unknown_turn_is_ignored() {
        let mut controller = ConversationController::new();
        assert!(!controller.resolve(ok(TurnId(42), "stray")));
        assert!(controller.transcript().is_empty());
    }

    #[test]
    fn test_transcript_properties_hold_over_many_turns() {
        let mut controller = ConversationController::new();
        let mut requests = Vec::new();

        for i in 0..20 {
            controller.update_draft(format!("question {i}"));
            let before = controller.transcript().len();
            requests.push(controller.submit().unwrap());
            assert_eq!(controller.transcript().len(), before + 1);
            assert_eq!(controller.draft(), "");
        }

        // Resolve odd turns in reverse, fail the even ones.
        for request in requests.iter().rev() {
            let result = if request.turn.0 % 2 == 1 {
                Ok(format!("answer to {}", request.prompt))
            } else {
                Err(GenerationError::EmptyResponse)
            };
            controller.resolve(TurnOutcome {
                turn: request.turn,
                result,
            });
        }

        let transcript = controller.transcript();
        assert_eq!(transcript.len(), 30);

        let ids: HashSet<_> = transcript.iter().map(Message::id).collect();
        assert_eq!(ids.len(), transcript.len());

        assert_eq!(transcript.messages()[0].sender(), Sender::Me);
        for (index, message) in transcript.iter().enumerate() {
            if message.sender() == Sender::Ai {
                let question = transcript
                    .iter()
                    .position(|m| m.sender() == Sender::Me && m.turn() == message.turn())
                    .expect("every reply has a question");
                assert!(question < index);
            }
        }

        let ids_assigned: Vec<u64> = controller.turns().map(|(t, _)| t.0).collect();
        assert_eq!(ids_assigned, (1..=20).collect::<Vec<_>>());
    }
}
