//! Retrieval-grounded question answering.
//!
//! [`GroundedAnswerer`] glues a [`RetrievalPipeline`] to a [`LanguageModel`]:
//! it retrieves the most relevant course chunks, folds them into a context
//! block, and asks the model to answer from that context alone.

use std::sync::Arc;

use lectern_model::{GenerationOptions, GenerationRequest, LanguageModel};
use lectern_rag::{RetrievalPipeline, SearchResult};
use tracing::{info, warn};

/// The fixed reply shown when retrieval or generation fails.
pub const ANSWER_FAILURE_MESSAGE: &str = "❌ Failed to generate an answer. Please try again.";

/// System instruction that keeps the model inside the retrieved context.
pub const GROUNDING_INSTRUCTION: &str = "Use the following pieces of course material to answer \
     the question at the end. Answer only from the given context. If the context is insufficient \
     to answer, say so explicitly instead of guessing.";

/// A generated answer together with the chunks it was grounded on.
///
/// `failed` is set when the pipeline or the model errored; the `text` then
/// holds [`ANSWER_FAILURE_MESSAGE`] rather than model output. Sources are
/// kept even on generation failure so a caller can still show what was
/// retrieved.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The answer text, or the failure message.
    pub text: String,
    /// The retrieved chunks the prompt was built from, best first.
    pub sources: Vec<SearchResult>,
    /// True when this is a failure reply instead of model output.
    pub failed: bool,
}

impl Answer {
    fn failure(sources: Vec<SearchResult>) -> Self {
        Self { text: ANSWER_FAILURE_MESSAGE.to_string(), sources, failed: true }
    }
}

fn compose_prompt(question: &str, sources: &[SearchResult]) -> String {
    let context: Vec<&str> = sources.iter().map(|result| result.chunk.text.as_str()).collect();
    let context = context.join("\n\n");
    format!("Context:\n{context}\n\nQuestion: {question}\nAnswer:")
}

/// Answers questions from course material via retrieval plus generation.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_assist::GroundedAnswerer;
///
/// let answerer = GroundedAnswerer::new(pipeline, model);
/// let answer = answerer.answer("What converts light to energy?").await;
/// println!("{}", answer.text);
/// ```
pub struct GroundedAnswerer {
    pipeline: Arc<RetrievalPipeline>,
    model: Arc<dyn LanguageModel>,
    options: GenerationOptions,
    top_k: Option<usize>,
}

impl GroundedAnswerer {
    /// Create an answerer over the given pipeline and model.
    pub fn new(pipeline: Arc<RetrievalPipeline>, model: Arc<dyn LanguageModel>) -> Self {
        Self { pipeline, model, options: GenerationOptions::default(), top_k: None }
    }

    /// Set the sampling options passed to every generation call.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the number of chunks retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// The retrieval pipeline backing this answerer.
    pub fn pipeline(&self) -> &Arc<RetrievalPipeline> {
        &self.pipeline
    }

    /// Answer one question from the indexed course material.
    ///
    /// This never returns an error: retrieval and generation failures are
    /// absorbed into a failure [`Answer`] so a student-facing surface always
    /// has something to display.
    pub async fn answer(&self, question: &str) -> Answer {
        // 1. Retrieve the most relevant chunks.
        let retrieved = match self.top_k {
            Some(top_k) => self.pipeline.query_with_top_k(question, top_k).await,
            None => self.pipeline.query(question).await,
        };
        let sources = match retrieved {
            Ok(sources) => sources,
            Err(e) => {
                warn!(error = %e, "retrieval failed");
                return Answer::failure(Vec::new());
            }
        };

        // 2. Compose the grounded prompt and generate.
        let request = GenerationRequest::new(compose_prompt(question, &sources))
            .with_system(GROUNDING_INSTRUCTION)
            .with_options(self.options.clone());

        match self.model.generate(request).await {
            Ok(text) => {
                info!(source_count = sources.len(), "answered question");
                Answer { text, sources, failed: false }
            }
            Err(e) => {
                warn!(error = %e, "generation failed");
                Answer::failure(sources)
            }
        }
    }
}
