//! Contract for the hosted text-generation service.
//!
//! The conversation controller never talks to the network itself. It hands
//! prompts to something implementing [`GenerationCollaborator`], which is
//! constructed once by the caller and injected. Production code uses
//! [`crate::GeminiClient`]; tests use in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A service that turns one prompt into one reply.
///
/// Calls are stateless: no conversation history is sent along.
#[async_trait]
pub trait GenerationCollaborator: Send + Sync {
    /// Generate the full reply text for a raw user prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Sampling randomness.
    pub temperature: f64,
    /// Nucleus sampling cutoff.
    pub top_p: f64,
    /// Candidate pool size.
    pub top_k: u32,
    /// Hard cap on reply length.
    pub max_output_tokens: u32,
    /// Requested reply format.
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: "text/plain".into(),
        }
    }
}

/// Errors a generation call can end with.
///
/// The controller does not branch on the variant; it records the rendered
/// message as the failure reason for the turn.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// The body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The prompt or reply was withheld by the service.
    #[error("blocked by the service: {0}")]
    Blocked(String),

    /// The service answered but without any text.
    #[error("response contained no text")]
    EmptyResponse,
}
