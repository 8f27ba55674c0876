//! Messages exchanged between the user and the model.
//!
//! A [`Message`] is immutable once created. Each one carries the [`TurnId`]
//! of the turn it belongs to, so a reply can always be traced back to the
//! question that produced it even when replies arrive out of order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier for one turn: a human submission and its (at most one) reply.
///
/// Turn ids are assigned in submission order starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    /// The human at the keyboard.
    #[serde(rename = "me")]
    Me,
    /// The hosted model.
    #[serde(rename = "AI")]
    Ai,
}

impl Sender {
    /// The wire tag for this sender.
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::Me => "me",
            Sender::Ai => "AI",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: Uuid,
    text: String,
    sender: Sender,
    turn: TurnId,
    sent_at: DateTime<Utc>,
}

impl Message {
    /// Create a human-authored message.
    pub fn me(text: impl Into<String>, turn: TurnId) -> Self {
        Self::new(text, Sender::Me, turn)
    }

    /// Create a model-authored message.
    pub fn ai(text: impl Into<String>, turn: TurnId) -> Self {
        Self::new(text, Sender::Ai, turn)
    }

    fn new(text: impl Into<String>, sender: Sender, turn: TurnId) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            turn,
            sent_at: Utc::now(),
        }
    }

    /// Unique identifier, stable for list rendering.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Verbatim content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Who wrote the message.
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// The turn this message opened (human) or answers (model).
    pub fn turn(&self) -> TurnId {
        self.turn
    }

    /// When the message was appended.
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    /// Whether the human wrote this message.
    pub fn is_from_me(&self) -> bool {
        self.sender == Sender::Me
    }
}
