//! The [`LanguageModel`] trait and its request types.

use async_trait::async_trait;

use crate::error::Result;

/// Sampling and length controls for a generation call.
///
/// All fields are optional; unset fields use the backend's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    /// Sampling temperature. Higher values give more varied output.
    pub temperature: Option<f32>,
    /// Nucleus sampling probability mass.
    pub top_p: Option<f32>,
    /// Maximum number of tokens to generate.
    pub max_output_tokens: Option<u32>,
}

impl GenerationOptions {
    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the nucleus sampling probability mass.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// A single-shot generation request: an optional system instruction, a user
/// prompt, and sampling options.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Optional system instruction prepended to the conversation.
    pub system: Option<String>,
    /// The user prompt.
    pub prompt: String,
    /// Sampling and length controls.
    pub options: GenerationOptions,
}

impl GenerationRequest {
    /// Create a request with the given prompt and default options.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { system: None, prompt: prompt.into(), options: GenerationOptions::default() }
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the generation options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// A language model that turns one prompt into one completed text.
///
/// Implementations are `Send + Sync` so they can sit behind an `Arc` and
/// serve concurrent callers. Generation is single-shot: the full response
/// text is returned once the backend finishes.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// The model identifier, e.g. `llama3` or `gpt-4o-mini`.
    fn model_id(&self) -> &str;

    /// Generate a completion for the given request.
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
