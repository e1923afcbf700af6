//! Ollama text generation client for locally hosted models.
//!
//! This module is only available when the `ollama` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::provider::{GenerationRequest, LanguageModel};

/// The default Ollama server address.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// The default generation model.
const DEFAULT_MODEL: &str = "mistral";

/// Bound on a single generation call; local models can be slow, but a hung
/// server must surface as an error rather than stall the caller forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const PROVIDER: &str = "Ollama";

/// A [`LanguageModel`] backed by a locally hosted Ollama server.
///
/// Uses `reqwest` to call the `/api/generate` endpoint with streaming
/// disabled, so one request returns one complete response. No credential
/// is required.
///
/// # Configuration
///
/// - `base_url` – defaults to `http://localhost:11434`.
/// - `model` – defaults to `mistral`.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_model::ollama::OllamaClient;
/// use lectern_model::GenerationRequest;
///
/// let model = OllamaClient::new()?.with_model("llama3");
/// let text = model.generate(GenerationRequest::new("Summarize chapter one")).await?;
/// ```
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create a client targeting the default local server and model.
    pub fn new() -> Result<Self> {
        let client =
            reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
                ModelError::Config(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, base_url: DEFAULT_OLLAMA_URL.into(), model: DEFAULT_MODEL.into() })
    }

    /// Set the server address (e.g. `http://models.internal:11434`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name (e.g. `mistral`, `llama3:70b`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn post_generate(&self, body: &GenerateRequest<'_>) -> Result<GenerateResponse> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            ModelError::Request { provider: PROVIDER.to_string(), message: e.to_string() }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(provider = PROVIDER, %status, "API error");
            let detail = rejection_detail(response).await;
            return Err(ModelError::Api {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                message: detail,
            });
        }

        response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            ModelError::InvalidResponse { provider: PROVIDER.to_string(), message: e.to_string() }
        })
    }
}

/// Pull the server's error message out of a non-2xx response body.
async fn rejection_detail(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ServerError>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) => body,
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct ServerError {
    error: String,
}

fn generate_options(request: &GenerationRequest) -> Option<GenerateOptions> {
    let options = &request.options;
    if options.temperature.is_none()
        && options.top_p.is_none()
        && options.max_output_tokens.is_none()
    {
        return None;
    }
    Some(GenerateOptions {
        temperature: options.temperature,
        top_p: options.top_p,
        num_predict: options.max_output_tokens,
    })
}

// ── LanguageModel implementation ───────────────────────────────────

#[async_trait]
impl LanguageModel for OllamaClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.model,
            prompt_len = request.prompt.len(),
            "generating"
        );

        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: generate_options(&request),
        };
        let reply = self.post_generate(&body).await?;

        Ok(reply.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::GenerationOptions;

    #[test]
    fn request_body_disables_streaming() {
        let request = GenerationRequest::new("When is the midterm?");
        let body = GenerateRequest {
            model: "llama3",
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: generate_options(&request),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llama3",
                "prompt": "When is the midterm?",
                "stream": false,
            })
        );
    }

    #[test]
    fn request_body_carries_system_and_options() {
        let request = GenerationRequest::new("Explain photosynthesis")
            .with_system("You are a course assistant.")
            .with_options(
                GenerationOptions::default().with_temperature(0.5).with_max_output_tokens(256),
            );
        let body = GenerateRequest {
            model: "mistral",
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: generate_options(&request),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "mistral",
                "prompt": "Explain photosynthesis",
                "system": "You are a course assistant.",
                "stream": false,
                "options": { "temperature": 0.5, "num_predict": 256 },
            })
        );
    }

    #[test]
    fn response_parses_the_response_field() {
        let body = r#"{"model":"llama3","response":"The midterm is in week six.","done":true}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "The midterm is in week six.");
    }
}
