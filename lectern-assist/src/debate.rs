//! Debate-argument critique.
//!
//! [`ArgumentCritic`] gives students one-shot coaching feedback on a
//! written debate argument: claim clarity, evidence, counterarguments,
//! and structure. There is no conversation state; each critique is a
//! single prompt and a single reply.

use std::sync::Arc;

use lectern_model::{GenerationOptions, GenerationRequest, LanguageModel};
use tracing::{info, warn};

/// The fixed reply shown when generation fails.
pub const CRITIQUE_FAILURE_MESSAGE: &str = "❌ Failed to generate feedback.";

/// The fixed reply for empty argument submissions.
pub const EMPTY_ARGUMENT_MESSAGE: &str = "⚠️ No argument text provided.";

const COACH_INSTRUCTION: &str = "You are a debate coach reviewing a student's argument.";

/// Coaching feedback on one debate argument.
#[derive(Debug, Clone)]
pub struct Critique {
    /// The model's feedback, or a marked failure message.
    pub text: String,
    /// True when this is a failure reply instead of model output.
    pub failed: bool,
}

impl Critique {
    fn failure(message: &str) -> Self {
        Self { text: message.to_string(), failed: true }
    }
}

fn compose_prompt(argument: &str) -> String {
    format!(
        "Critique this debate argument for a student.\n\nArgument:\n{argument}\n\n\
         Address:\n\
         1. Is the claim clearly stated?\n\
         2. Is the claim supported with evidence?\n\
         3. Which counterarguments should the student anticipate?\n\
         4. How can the structure and delivery improve?\n\n\
         Give concrete, actionable feedback."
    )
}

/// Produces one-shot critiques of student debate arguments.
pub struct ArgumentCritic {
    model: Arc<dyn LanguageModel>,
    options: GenerationOptions,
}

impl ArgumentCritic {
    /// Create a critic backed by the given model.
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model, options: GenerationOptions::default() }
    }

    /// Set the sampling options passed to every generation call.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Critique one argument. An empty submission short-circuits to
    /// [`EMPTY_ARGUMENT_MESSAGE`] without calling the model; generation
    /// failures surface as a marked failure [`Critique`], never an error.
    pub async fn critique(&self, argument: &str) -> Critique {
        if argument.trim().is_empty() {
            return Critique::failure(EMPTY_ARGUMENT_MESSAGE);
        }

        let request = GenerationRequest::new(compose_prompt(argument))
            .with_system(COACH_INSTRUCTION)
            .with_options(self.options.clone());

        match self.model.generate(request).await {
            Ok(text) => {
                info!(argument_chars = argument.len(), "critiqued argument");
                Critique { text, failed: false }
            }
            Err(e) => {
                warn!(error = %e, "argument critique failed");
                Critique::failure(CRITIQUE_FAILURE_MESSAGE)
            }
        }
    }
}
