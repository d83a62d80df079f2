// src/provider/google.rs — Google Generative AI (Gemini) REST provider

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;

use super::{GenerateRequest, GenerateResponse, GenerativeProvider, ModelListing, TokenUsage};
use crate::core::session::Credential;
use crate::infra::errors::PromptLabError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER_ID: &str = "google";
const LIST_PAGE_SIZE: &str = "1000";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GoogleProvider {
    base_url: String,
    client: reqwest::Client,
}

impl GoogleProvider {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, PromptLabError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| PromptLabError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the `generateContent` body.
    fn build_request_body(request: &GenerateRequest) -> serde_json::Value {
        let config = &request.config;
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": {
                "temperature": config.temperature(),
                "topP": config.top_p(),
                "topK": config.top_k(),
                "maxOutputTokens": config.max_output_tokens(),
            },
            "safetySettings": request.safety.settings(),
        })
    }

    /// The URL is dropped from the message so request details never reach
    /// the terminal or the log.
    fn transport_error(e: reqwest::Error) -> PromptLabError {
        PromptLabError::Provider {
            provider: PROVIDER_ID.into(),
            message: e.without_url().to_string(),
            status: None,
            provider_status: None,
        }
    }

    /// Turn a non-2xx response into a structured error.
    ///
    /// Gemini errors look like `{"error": {"code": 400, "message": "...",
    /// "status": "INVALID_ARGUMENT"}}`. Anything else is kept raw.
    async fn error_from_response(response: reqwest::Response) -> PromptLabError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error_from_body(status.as_u16(), &body)
    }
}

pub(crate) fn error_from_body(status: u16, body: &str) -> PromptLabError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().map(|v| &v["error"]);

    let provider_message = error.and_then(|e| e["message"].as_str());
    let provider_status = error
        .and_then(|e| e["status"].as_str())
        .map(|s| s.to_string());

    let message = match provider_message {
        Some(m) => format!("{status} {m}"),
        None if body.trim().is_empty() => format!("HTTP {status}"),
        None => format!("HTTP {status}: {}", body.trim()),
    };

    if status == 429 {
        return PromptLabError::RateLimited {
            provider: PROVIDER_ID.into(),
            message,
        };
    }

    PromptLabError::Provider {
        provider: PROVIDER_ID.into(),
        message,
        status: Some(status),
        provider_status,
    }
}

/// Pull the generated text out of a `generateContent` response.
pub(crate) fn parse_generate_response(
    resp: &serde_json::Value,
) -> Result<GenerateResponse, PromptLabError> {
    if let Some(reason) = resp["promptFeedback"]["blockReason"].as_str() {
        return Err(PromptLabError::EmptyResponse {
            reason: format!("prompt blocked: {reason}"),
        });
    }

    let candidate = &resp["candidates"][0];
    if candidate.is_null() {
        return Err(PromptLabError::EmptyResponse {
            reason: "no candidates returned".into(),
        });
    }

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default();

    let finish_reason = candidate["finishReason"].as_str().map(|s| s.to_string());

    if text.is_empty() {
        return Err(PromptLabError::EmptyResponse {
            reason: format!(
                "finish reason: {}",
                finish_reason.as_deref().unwrap_or("unknown")
            ),
        });
    }

    let usage = TokenUsage {
        input_tokens: token_count(&resp["usageMetadata"]["promptTokenCount"]),
        output_tokens: token_count(&resp["usageMetadata"]["candidatesTokenCount"]),
    };

    Ok(GenerateResponse {
        text,
        finish_reason,
        usage,
    })
}

fn token_count(value: &serde_json::Value) -> u32 {
    value
        .as_u64()
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

#[async_trait]
impl GenerativeProvider for GoogleProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    async fn list_models(
        &self,
        credential: &Credential,
    ) -> Result<Vec<ModelListing>, PromptLabError> {
        let url = format!("{}/models", self.base_url());
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut query = vec![("pageSize", LIST_PAGE_SIZE)];
            if let Some(ref token) = page_token {
                query.push(("pageToken", token.as_str()));
            }

            let response = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, credential.expose())
                .query(&query)
                .send()
                .await
                .map_err(Self::transport_error)?;

            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let page: serde_json::Value = response.json().await.map_err(|e| {
                PromptLabError::Provider {
                    provider: PROVIDER_ID.into(),
                    message: format!("Failed to parse model list: {}", e.without_url()),
                    status: None,
                    provider_status: None,
                }
            })?;

            if let Some(entries) = page["models"].as_array() {
                for entry in entries {
                    match serde_json::from_value::<ModelListing>(entry.clone()) {
                        Ok(m) => models.push(m),
                        Err(e) => tracing::debug!("Skipping unreadable model entry: {e}"),
                    }
                }
            }

            match page["nextPageToken"].as_str() {
                Some(next) if !next.is_empty() => {
                    if !seen_tokens.insert(next.to_string()) {
                        tracing::warn!("Model listing repeated a page token; stopping");
                        break;
                    }
                    page_token = Some(next.to_string());
                }
                _ => break,
            }
        }

        tracing::debug!("Listed {} models", models.len());
        Ok(models)
    }

    async fn generate(
        &self,
        credential: &Credential,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, PromptLabError> {
        let body = Self::build_request_body(request);
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url(),
            request.model
        );

        tracing::debug!(model = %request.model, config = %request.config, "generateContent");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, credential.expose())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let resp: serde_json::Value =
            response.json().await.map_err(|e| PromptLabError::Provider {
                provider: PROVIDER_ID.into(),
                message: format!("Failed to parse response: {}", e.without_url()),
                status: None,
                provider_status: None,
            })?;

        parse_generate_response(&resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generation::{GenerationConfig, SafetyPolicy};

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            model: "gemini-pro".into(),
            prompt: "  Say hi ".into(),
            config: GenerationConfig::new(0.5, 0.25, 12, 256),
            safety: SafetyPolicy::default(),
        };
        let body = GoogleProvider::build_request_body(&request);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "  Say hi ");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert_eq!(body["generationConfig"]["topP"], 0.25);
        assert_eq!(body["generationConfig"]["topK"], 12);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);

        let safety = body["safetySettings"].as_array().unwrap();
        assert_eq!(safety.len(), 4);
        assert!(safety.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
        assert_eq!(safety[0]["category"], "HARM_CATEGORY_DANGEROUS_CONTENT");
        assert_eq!(safety[3]["category"], "HARM_CATEGORY_HARASSMENT");
    }

    #[test]
    fn test_parse_concatenates_parts() {
        let resp = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello " }, { "text": "there" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 3, "candidatesTokenCount": 2 }
        });
        let r = parse_generate_response(&resp).unwrap();
        assert_eq!(r.text, "Hello there");
        assert_eq!(r.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(r.usage.total(), 5);
    }

    #[test]
    fn test_parse_blocked_prompt() {
        let resp = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = parse_generate_response(&resp).unwrap_err();
        assert_eq!(
            err.to_string(),
            "response contained no text (prompt blocked: SAFETY)"
        );
    }

    #[test]
    fn test_parse_no_candidates() {
        let err = parse_generate_response(&serde_json::json!({})).unwrap_err();
        assert!(matches!(err, PromptLabError::EmptyResponse { .. }));
    }

    #[test]
    fn test_parse_candidate_without_text() {
        let resp = serde_json::json!({ "candidates": [{ "finishReason": "RECITATION" }] });
        let err = parse_generate_response(&resp).unwrap_err();
        assert_eq!(
            err.to_string(),
            "response contained no text (finish reason: RECITATION)"
        );
    }

    #[test]
    fn test_token_counts_saturate() {
        let resp = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }],
            "usageMetadata": {
                "promptTokenCount": u64::MAX,
                "candidatesTokenCount": 5_000_000_000u64
            }
        });
        let r = parse_generate_response(&resp).unwrap();
        assert_eq!(r.usage.input_tokens, u32::MAX);
        assert_eq!(r.usage.output_tokens, u32::MAX);
        assert_eq!(r.usage.total(), u32::MAX);
    }

    #[test]
    fn test_error_body_429_is_rate_limited() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = error_from_body(429, body);
        assert!(matches!(err, PromptLabError::RateLimited { .. }));
        assert_eq!(
            err.to_string(),
            "429 Resource has been exhausted (e.g. check quota)."
        );
        assert!(err.is_quota());
    }

    #[test]
    fn test_error_body_structured() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        match error_from_body(400, body) {
            PromptLabError::Provider {
                message,
                status,
                provider_status,
                ..
            } => {
                assert_eq!(message, "400 API key not valid.");
                assert_eq!(status, Some(400));
                assert_eq!(provider_status.as_deref(), Some("INVALID_ARGUMENT"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_body_unstructured() {
        assert_eq!(
            error_from_body(502, "Bad Gateway").to_string(),
            "HTTP 502: Bad Gateway"
        );
        assert_eq!(error_from_body(503, "").to_string(), "HTTP 503");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let p = GoogleProvider::new("http://localhost:1234/v1beta/", None).unwrap();
        assert_eq!(p.base_url(), "http://localhost:1234/v1beta");
    }
}
