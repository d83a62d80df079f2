// src/infra/errors.rs — Error types for promptlab

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptLabError {
    // Provider errors
    #[error("{message}")]
    Provider {
        provider: String,
        message: String,
        /// HTTP status, when the failure came back as a response.
        status: Option<u16>,
        /// Provider-level status string, e.g. `INVALID_ARGUMENT`.
        provider_status: Option<String>,
    },

    #[error("{message}")]
    RateLimited { provider: String, message: String },

    #[error("response contained no text ({reason})")]
    EmptyResponse { reason: String },

    // User errors
    #[error("No API key entered")]
    MissingCredential,

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PromptLabError {
    /// Whether this error signals an exhausted quota or a rate limit.
    ///
    /// Structured signals win: a 429 or a `RESOURCE_EXHAUSTED` status. When
    /// the provider gives neither, fall back to scanning the raw text for
    /// "quota" (any case) or "429", which depends on wording the provider
    /// does not promise to keep stable.
    pub fn is_quota(&self) -> bool {
        match self {
            PromptLabError::RateLimited { .. } => true,
            PromptLabError::Provider {
                status,
                provider_status,
                ..
            } if *status == Some(429)
                || provider_status.as_deref() == Some("RESOURCE_EXHAUSTED") =>
            {
                true
            }
            other => mentions_quota(&other.to_string()),
        }
    }
}

/// Text fallback for quota detection.
pub fn mentions_quota(text: &str) -> bool {
    text.to_lowercase().contains("quota") || text.contains("429")
}
