//! OpenAI chat completion client.
//!
//! This module is only available when the `openai` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::provider::{GenerationRequest, LanguageModel};

/// The default OpenAI chat completions endpoint.
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Model used when none is configured.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Bound on a single generation call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const PROVIDER: &str = "OpenAI";

/// A [`LanguageModel`] backed by the OpenAI chat completions API.
///
/// Calls `/v1/chat/completions` with streaming disabled. The system
/// instruction, when present, is sent as a `system` message ahead of the
/// user prompt.
///
/// # Configuration
///
/// - `model` – defaults to `gpt-4o-mini`.
/// - `api_key` – from the constructor, or `OPENAI_API_KEY` via
///   [`from_env`](OpenAIChatClient::from_env).
/// - `base_url` – override for OpenAI-compatible servers.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_model::openai::OpenAIChatClient;
/// use lectern_model::GenerationRequest;
///
/// let model = OpenAIChatClient::from_env()?;
/// let text = model.generate(GenerationRequest::new("Summarize chapter one")).await?;
/// ```
pub struct OpenAIChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIChatClient {
    /// Create a new client with the given API key and the default model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingCredential`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModelError::MissingCredential("API key must not be empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: OPENAI_CHAT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Create a new client using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) => Self::new(key),
            Err(_) => Err(ModelError::MissingCredential(
                "OPENAI_API_KEY environment variable not set".into(),
            )),
        }
    }

    /// Set the model name (e.g. `gpt-4o`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at an OpenAI-compatible chat completions endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post_chat(&self, body: &ChatRequest<'_>) -> Result<ChatResponse> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
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
    match serde_json::from_str::<ApiError>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body,
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── LanguageModel implementation ───────────────────────────────────

#[async_trait]
impl LanguageModel for OpenAIChatClient {
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

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage { role: "system", content: system });
        }
        messages.push(ChatMessage { role: "user", content: &request.prompt });

        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: request.options.temperature,
            top_p: request.options.top_p,
            max_tokens: request.options.max_output_tokens,
        };
        let reply = self.post_chat(&body).await?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelError::InvalidResponse {
                provider: PROVIDER.to_string(),
                message: "response contained no choices".into(),
            })
    }
}
