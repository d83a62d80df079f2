// src/core/controller.rs — Prompt session controller
//
// Owns one Session and drives the configure → submit → classify → record
// cycle. Every provider failure is absorbed here and handed back as a value;
// nothing escapes to end the session.

use std::sync::Arc;

use super::generation::{GenerationConfig, SafetyPolicy};
use super::session::{Credential, Exchange, Session};
use crate::infra::errors::PromptLabError;
use crate::provider::{GenerateRequest, GenerativeProvider};

/// Used when the model list cannot be fetched.
pub const FALLBACK_MODEL: &str = "gemini-pro";

/// Result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Recorded in history; carries a copy of the new entry.
    Success(Exchange),
    /// Quota or rate-limit failure, with the raw provider detail.
    QuotaExceeded(String),
    /// Any other failure, with the raw provider detail.
    ProviderError(String),
    /// Blank prompt; the provider was not called.
    EmptyPrompt,
    /// No credential bound; the provider was not called.
    CredentialMissing,
}

impl GenerationOutcome {
    /// Classify a failed generation call.
    pub fn from_error(err: &PromptLabError) -> Self {
        if err.is_quota() {
            GenerationOutcome::QuotaExceeded(err.to_string())
        } else {
            GenerationOutcome::ProviderError(err.to_string())
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }
}

/// Result of model discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    /// Selectable model names, provider order, namespace stripped.
    pub models: Vec<String>,
    /// Preselected entry.
    pub selected: String,
    /// Set when discovery failed and the fallback model is in use.
    pub warning: Option<String>,
}

pub struct PromptSession {
    provider: Arc<dyn GenerativeProvider>,
    session: Session,
    safety: SafetyPolicy,
    fallback_model: String,
    preferred_model: Option<String>,
}

impl PromptSession {
    pub fn new(provider: Arc<dyn GenerativeProvider>, generation: GenerationConfig) -> Self {
        let session = Session::new(generation);
        tracing::info!(
            session = %session.id,
            created_at = %session.created_at.to_rfc3339(),
            provider = provider.id(),
            "session started"
        );
        Self {
            provider,
            session,
            safety: SafetyPolicy::default(),
            fallback_model: FALLBACK_MODEL.into(),
            preferred_model: None,
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_preferred_model(mut self, model: Option<String>) -> Self {
        self.preferred_model = model;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn safety(&self) -> &SafetyPolicy {
        &self.safety
    }

    pub fn generation(&self) -> &GenerationConfig {
        &self.session.generation
    }

    pub fn generation_mut(&mut self) -> &mut GenerationConfig {
        &mut self.session.generation
    }

    /// True once a credential is bound. Until then listing, submission and
    /// history are all unavailable.
    pub fn is_unlocked(&self) -> bool {
        self.session.credential().is_some()
    }

    /// Bind (or replace) the session's credential. Blank input is refused
    /// and leaves any existing credential in place.
    pub fn bind_credential(&mut self, key: &str) -> Result<(), PromptLabError> {
        let credential = Credential::new(key).ok_or(PromptLabError::MissingCredential)?;
        self.session.set_credential(credential);
        tracing::info!(session = %self.session.id, "credential bound");
        Ok(())
    }

    /// Fetch the models this credential can prompt, and preselect one.
    ///
    /// Failure never leaves the session without a model: the fallback is
    /// selected and the error text comes back as a warning.
    pub async fn discover_models(&mut self) -> Result<Discovery, PromptLabError> {
        let credential = self
            .session
            .credential()
            .ok_or(PromptLabError::MissingCredential)?;

        let listed = self.provider.list_models(credential).await;

        let (models, warning) = match listed {
            Ok(listings) => {
                let models: Vec<String> = listings
                    .iter()
                    .filter(|m| m.supports_generate_content())
                    .map(|m| m.short_name().to_string())
                    .collect();
                if models.is_empty() {
                    tracing::warn!("No models support content generation; using fallback");
                    (
                        vec![self.fallback_model.clone()],
                        Some("No models available for content generation".to_string()),
                    )
                } else {
                    (models, None)
                }
            }
            Err(e) => {
                tracing::warn!("Model discovery failed: {e}");
                (vec![self.fallback_model.clone()], Some(e.to_string()))
            }
        };

        let selected = self
            .preferred_model
            .as_ref()
            .filter(|p| models.contains(p))
            .cloned()
            .unwrap_or_else(|| models[0].clone());

        self.session.set_models(models.clone());
        self.session.select_model(selected.clone());

        Ok(Discovery {
            models,
            selected,
            warning,
        })
    }

    /// Switch to a model from the discovered list.
    pub fn select_model(&mut self, name: &str) -> Result<(), PromptLabError> {
        if !self.session.models().iter().any(|m| m == name) {
            return Err(PromptLabError::Config(format!(
                "Unknown model '{name}'. Use /models to list available models."
            )));
        }
        self.session.select_model(name);
        Ok(())
    }

    /// Submit one prompt to the selected model.
    ///
    /// The provider is called at most once. Only a successful call touches
    /// history.
    pub async fn submit(&mut self, prompt: &str) -> GenerationOutcome {
        if prompt.trim().is_empty() {
            return GenerationOutcome::EmptyPrompt;
        }
        let Some(credential) = self.session.credential() else {
            return GenerationOutcome::CredentialMissing;
        };

        let model = self
            .session
            .selected_model()
            .unwrap_or(&self.fallback_model)
            .to_string();

        let request = GenerateRequest {
            model: model.clone(),
            prompt: prompt.to_string(),
            config: self.session.generation,
            safety: self.safety.clone(),
        };

        match self.provider.generate(credential, &request).await {
            Ok(response) => {
                let exchange = Exchange::new(prompt, &response.text, model);
                tracing::debug!(
                    session = %self.session.id,
                    tokens = response.usage.total(),
                    "generation recorded"
                );
                self.session.record(exchange.clone());
                GenerationOutcome::Success(exchange)
            }
            Err(e) => {
                let outcome = GenerationOutcome::from_error(&e);
                tracing::warn!(session = %self.session.id, quota = e.is_quota(), "generation failed: {e}");
                outcome
            }
        }
    }

    /// Chronological history, oldest first.
    pub fn history(&self) -> &[Exchange] {
        self.session.history()
    }
}
