//! Backend-agnostic text generation abstraction.
//!
//! Every model backend implements [`TextGenerator`], so the workflow steps
//! never depend on a particular vendor API.

use async_trait::async_trait;
use thiserror::Error;

/// A text-completion capability: rendered prompt in, raw text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a fully rendered prompt.
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Provider name for metrics/logging.
    fn provider_name(&self) -> &str;
}

/// Errors that can occur during a generation call.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// No backend is configured (missing credentials).
    #[error("generation backend unavailable: {0}")]
    Unavailable(String),
    /// Transport failure before a response was received.
    #[error("request failed: {0}")]
    Http(String),
    /// The backend answered with an error status or error body.
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// The backend answered but produced no usable text.
    #[error("empty response from {0}")]
    EmptyResponse(String),
    /// A prompt template could not be rendered.
    #[error("template error: {0}")]
    Template(String),
}

impl GenerationError {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Http(_) | GenerationError::EmptyResponse(_) => true,
            GenerationError::Api { status, .. } => *status == 429 || *status >= 500,
            GenerationError::Unavailable(_) | GenerationError::Template(_) => false,
        }
    }
}
