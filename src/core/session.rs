// src/core/session.rs — Session-scoped state: credential, model, history

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use super::generation::GenerationConfig;

/// An API key bound to one session.
///
/// Formatting never reveals the key; use [`Credential::expose`] at the one
/// place that builds the request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// One completed prompt/response pair. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    prompt: String,
    response: String,
    model: String,
    recorded_at: DateTime<Utc>,
}

impl Exchange {
    /// The prompt is kept verbatim; the response is trimmed.
    pub fn new(prompt: impl Into<String>, response: &str, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.trim().to_string(),
            model: model.into(),
            recorded_at: Utc::now(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Everything one user's interaction owns. Nothing here is shared between
/// sessions.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    credential: Option<Credential>,
    models: Vec<String>,
    selected_model: Option<String>,
    pub generation: GenerationConfig,
    history: Vec<Exchange>,
}

impl Session {
    pub fn new(generation: GenerationConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            credential: None,
            models: Vec::new(),
            selected_model: None,
            generation,
            history: Vec::new(),
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Replace the credential. The model list belonged to the old key, so it
    /// is cleared until discovery runs again.
    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
        self.models.clear();
        self.selected_model = None;
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn set_models(&mut self, models: Vec<String>) {
        self.models = models;
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.selected_model.as_deref()
    }

    pub fn select_model(&mut self, model: impl Into<String>) {
        self.selected_model = Some(model.into());
    }

    /// Chronological order, oldest first.
    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    pub(crate) fn record(&mut self, exchange: Exchange) {
        self.history.push(exchange);
    }
}
