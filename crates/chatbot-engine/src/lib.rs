//! chatbot-engine: Headless core of the chatbot widget
//!
//! This crate holds everything that is not presentation:
//! - Messages and the append-only transcript
//! - The conversation controller (visibility, draft, submit/resolve protocol)
//! - The generation collaborator contract and its Gemini HTTP implementation
//! - Background dispatch of turn requests
//! - Configuration

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod gemini;
pub mod generation;
pub mod message;
pub mod transcript;

// Re-export commonly used types
pub use config::{
    api_key_from_env, resolve_api_key, Config, ConfigError, ThemeVariant, API_KEY_ENV,
    FALLBACK_API_KEY_ENV,
};
pub use controller::{ConversationController, TurnOutcome, TurnRequest, TurnStatus};
pub use dispatch::TurnDispatcher;
pub use gemini::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use generation::{GenerationCollaborator, GenerationConfig, GenerationError};
pub use message::{Message, Sender, TurnId};
pub use transcript::Transcript;

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
