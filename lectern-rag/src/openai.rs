//! OpenAI embedding client.
//!
//! This module is only available when the `openai` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The OpenAI embeddings endpoint.
const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Model used when none is configured.
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Native dimensionality of `text-embedding-3-small`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// Bound on a single embedding request; a hung connection surfaces as an error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const PROVIDER: &str = "OpenAI";

/// An [`EmbeddingProvider`] that calls the OpenAI `/v1/embeddings` API.
///
/// Sends the whole batch in one `reqwest` call with a bounded timeout.
/// A bearer credential is required.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-3-small` (1536 dimensions).
/// - `dimensions` – optional Matryoshka truncation, forwarded to the API.
/// - `api_key` – from the constructor, or `OPENAI_API_KEY` via
///   [`from_env`](OpenAIEmbeddingProvider::from_env).
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::openai::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::from_env()?;
/// let vectors = provider.embed_batch(&["photosynthesis", "mitochondria"]).await?;
/// ```
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    /// Forwarded to the API when set; the server truncates to this size.
    request_dimensions: Option<usize>,
}

fn openai_error(message: String) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.to_string(), message }
}

impl OpenAIEmbeddingProvider {
    /// Create a provider with the given API key and the default model.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the HTTP client cannot be
    /// constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(openai_error("API key must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| openai_error(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
        })
    }

    /// Create a provider from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) => Self::new(key),
            Err(_) => {
                Err(openai_error("OPENAI_API_KEY environment variable not set".to_string()))
            }
        }
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Truncate embeddings to `dims` (Matryoshka models only).
    ///
    /// The value is sent with every request and becomes the dimensionality
    /// reported by [`dimensions()`](EmbeddingProvider::dimensions).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }

    async fn post_embeddings(&self, body: &EmbeddingsRequest<'_>) -> Result<EmbeddingsResponse> {
        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                openai_error(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(provider = PROVIDER, %status, "API error");
            let detail = rejection_detail(response).await;
            return Err(openai_error(format!("API returned {status}: {detail}")));
        }

        response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            openai_error(format!("failed to parse response: {e}"))
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
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors.pop().ok_or_else(|| openai_error("API returned no embedding".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            provider = PROVIDER,
            model = %self.model,
            batch_size = texts.len(),
            "embedding batch"
        );

        let body = EmbeddingsRequest {
            model: &self.model,
            input: texts.to_vec(),
            dimensions: self.request_dimensions,
        };
        let reply = self.post_embeddings(&body).await?;

        if reply.data.len() != texts.len() {
            return Err(openai_error(format!(
                "API returned {} embeddings for {} inputs",
                reply.data.len(),
                texts.len()
            )));
        }
        Ok(reply.data.into_iter().map(|row| row.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
