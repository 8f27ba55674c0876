//! The append-only transcript.

use crate::message::{Message, Sender, TurnId};
use serde::Serialize;

/// Ordered list of messages, oldest first.
///
/// Only the conversation controller can append; nothing can edit or remove
/// an entry once it is in.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterate over messages in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The model's reply to a turn, if it has arrived.
    pub fn reply_to(&self, turn: TurnId) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.sender() == Sender::Ai && m.turn() == turn)
    }

    /// The human message that opened a turn.
    pub fn question_for(&self, turn: TurnId) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.sender() == Sender::Me && m.turn() == turn)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
