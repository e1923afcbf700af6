//! Mock language model for tests and offline demos.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{ModelError, Result};
use crate::provider::{GenerationRequest, LanguageModel};

/// A [`LanguageModel`] that returns a canned reply and records every request.
///
/// Tests use the recorded requests to assert on the exact prompts a caller
/// composed, and [`MockLlm::failing`] to exercise generation-failure paths.
pub struct MockLlm {
    reply: String,
    fail: bool,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockLlm {
    /// Create a mock that answers every request with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into(), fail: false, requests: Mutex::new(Vec::new()) }
    }

    /// Create a mock whose every generation call fails.
    pub fn failing() -> Self {
        Self { reply: String::new(), fail: true, requests: Mutex::new(Vec::new()) }
    }

    /// The requests received so far, in call order.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    /// The number of generation calls received so far.
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl LanguageModel for MockLlm {
    fn model_id(&self) -> &str {
        "mock-llm"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.requests.lock().await.push(request);
        if self.fail {
            return Err(ModelError::Request {
                provider: "mock".to_string(),
                message: "mock generation failure".to_string(),
            });
        }
        Ok(self.reply.clone())
    }
}
