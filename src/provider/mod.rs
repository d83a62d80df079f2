// src/provider/mod.rs — Model provider layer

pub mod google;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::generation::{GenerationConfig, SafetyPolicy};
use crate::core::session::Credential;
use crate::infra::errors::PromptLabError;

/// Capability name a model must advertise to be offered for prompting.
pub const GENERATE_CONTENT: &str = "generateContent";

/// The two provider capabilities the playground consumes.
///
/// The credential is an argument on every call rather than provider state,
/// so one provider value can serve any number of sessions.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn list_models(&self, credential: &Credential)
        -> Result<Vec<ModelListing>, PromptLabError>;

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, PromptLabError>;
}

/// One entry from the provider's model listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListing {
    /// Fully qualified, e.g. `models/gemini-2.0-flash`.
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelListing {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }

    /// Name without the `models/` namespace.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub config: GenerationConfig,
    pub safety: SafetyPolicy,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    pub text: String,
    pub finish_reason: Option<String>,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, methods: &[&str]) -> ModelListing {
        ModelListing {
            name: name.into(),
            display_name: None,
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_short_name_strips_namespace() {
        assert_eq!(
            listing("models/gemini-2.0-flash", &[]).short_name(),
            "gemini-2.0-flash"
        );
        assert_eq!(listing("gemini-pro", &[]).short_name(), "gemini-pro");
    }

    #[test]
    fn test_short_name_only_strips_leading_prefix() {
        assert_eq!(
            listing("tunedModels/models/x", &[]).short_name(),
            "tunedModels/models/x"
        );
    }

    #[test]
    fn test_supports_generate_content() {
        assert!(listing("m", &["countTokens", "generateContent"]).supports_generate_content());
        assert!(!listing("m", &["embedContent"]).supports_generate_content());
        assert!(!listing("m", &[]).supports_generate_content());
    }

    #[test]
    fn test_listing_deserializes_camel_case() {
        let v = serde_json::json!({
            "name": "models/gemini-pro",
            "displayName": "Gemini Pro",
            "supportedGenerationMethods": ["generateContent"],
            "inputTokenLimit": 30720
        });
        let l: ModelListing = serde_json::from_value(v).unwrap();
        assert_eq!(l.display_name.as_deref(), Some("Gemini Pro"));
        assert!(l.supports_generate_content());
    }

    #[test]
    fn test_token_usage_total() {
        let u = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(u.total(), 150);
    }
}
