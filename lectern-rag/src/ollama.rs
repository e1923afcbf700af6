//! Ollama embedding provider backed by a local model server.
//!
//! This module is only available when the `ollama` feature is enabled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Ollama server address.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Model used when none is configured.
const DEFAULT_MODEL: &str = "all-minilm";

/// Dimensionality of `all-minilm` embeddings.
const DEFAULT_DIMENSIONS: usize = 384;

/// Bound on a single embedding request; a hung server surfaces as an error.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const PROVIDER: &str = "Ollama";

/// An [`EmbeddingProvider`] backed by a locally hosted Ollama server.
///
/// Calls the `/api/embed` endpoint, which takes the whole batch in one
/// request. No credential is required.
///
/// # Configuration
///
/// - `base_url` – defaults to `http://localhost:11434`.
/// - `model` – defaults to `all-minilm` (384 dimensions).
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::ollama::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new()?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

fn ollama_error(message: String) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.to_string(), message }
}

impl OllamaEmbeddingProvider {
    /// Create a provider targeting the default local server and model.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ollama_error(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Set the server address (e.g. `http://embeddings.internal:11434`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model name and its embedding dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }

    async fn post_embed(&self, body: &EmbedRequest<'_>) -> Result<EmbedResponse> {
        let url = format!("{}/api/embed", self.base_url);
        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "request failed");
            ollama_error(format!("request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(provider = PROVIDER, %status, "server error");
            let detail = rejection_detail(response).await;
            return Err(ollama_error(format!("server returned {status}: {detail}")));
        }

        response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            ollama_error(format!("failed to parse response: {e}"))
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
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Deserialize)]
struct ServerError {
    error: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors.pop().ok_or_else(|| ollama_error("server returned no embedding".to_string()))
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

        let body = EmbedRequest { model: &self.model, input: texts.to_vec() };
        let reply = self.post_embed(&body).await?;

        if reply.embeddings.len() != texts.len() {
            return Err(ollama_error(format!(
                "server returned {} embeddings for {} inputs",
                reply.embeddings.len(),
                texts.len()
            )));
        }
        Ok(reply.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
