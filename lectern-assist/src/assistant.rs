//! The instructor-facing assistant facade.
//!
//! [`CourseAssistant`] owns the whole surface a course UI talks to: the
//! question gate, grounded answering over the loaded course directory,
//! review-question generation, and debate critique. Construction loads
//! and indexes the course material once; afterwards the assistant is a
//! read-only handle safe to share across request handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lectern_model::{GenerationOptions, LanguageModel};
use lectern_rag::{
    DocumentLoader, EmbeddingProvider, ParagraphChunker, RetrievalConfig, RetrievalPipeline,
    SkippedFile,
};
use tracing::{info, warn};

use crate::answerer::{Answer, GroundedAnswerer};
use crate::debate::{ArgumentCritic, Critique};
use crate::error::{AssistError, Result};
use crate::gate::{GateDecision, QuestionGate, REFUSAL_MESSAGE};
use crate::review::{ReviewQuestionGenerator, ReviewSheet};

/// One gated reply to a student question.
#[derive(Debug, Clone)]
pub enum Reply {
    /// The question matched the blocklist and was refused.
    Refused(String),
    /// The question matched an instructor override; this is the canned answer.
    Canned(String),
    /// The question went through retrieval and generation.
    Answer(Answer),
}

/// The assistant facade: gate, grounded answering, review sheets, critique.
///
/// Built via [`CourseAssistant::builder`]. If the course directory yields
/// no documents the assistant comes up with question answering disabled:
/// [`ask`](CourseAssistant::ask) returns `None` and
/// [`is_ready`](CourseAssistant::is_ready) is `false`, while review
/// generation and critique keep working.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_assist::CourseAssistant;
///
/// let assistant = CourseAssistant::builder()
///     .course_dir("./course")
///     .model(model)
///     .embedder(embedder)
///     .build()
///     .await?;
///
/// if let Some(reply) = assistant.ask("When is the midterm?").await {
///     // show the reply
/// }
/// ```
pub struct CourseAssistant {
    gate: QuestionGate,
    answerer: Option<GroundedAnswerer>,
    review: ReviewQuestionGenerator,
    critic: ArgumentCritic,
    course_dir: PathBuf,
    decks: Vec<PathBuf>,
    skipped: Vec<SkippedFile>,
}

impl CourseAssistant {
    /// Create a new builder for constructing a [`CourseAssistant`].
    pub fn builder() -> CourseAssistantBuilder {
        CourseAssistantBuilder::default()
    }

    /// Whether question answering is available.
    ///
    /// `false` when the course directory produced no documents at build
    /// time; the gate is not consulted in that state.
    pub fn is_ready(&self) -> bool {
        self.answerer.is_some()
    }

    /// Answer a student question, subject to the gate.
    ///
    /// Returns `None` when question answering is disabled. Otherwise the
    /// gate runs first: blocklisted questions are refused and overridden
    /// questions get their canned answer, in both cases without touching
    /// retrieval or the model.
    pub async fn ask(&self, question: &str) -> Option<Reply> {
        let answerer = self.answerer.as_ref()?;

        let reply = match self.gate.check(question) {
            GateDecision::Blocked => Reply::Refused(REFUSAL_MESSAGE.to_string()),
            GateDecision::Canned(answer) => Reply::Canned(answer),
            GateDecision::Pass => Reply::Answer(answerer.answer(question).await),
        };
        Some(reply)
    }

    /// Generate `count` review questions from a slide deck.
    ///
    /// Works even when question answering is disabled.
    pub async fn review_questions(&self, deck: &Path, count: usize) -> ReviewSheet {
        self.review.generate_for_deck(deck, count).await
    }

    /// Critique a student's debate argument.
    ///
    /// Works even when question answering is disabled.
    pub async fn critique_argument(&self, argument: &str) -> Critique {
        self.critic.critique(argument).await
    }

    /// The `.pptx` decks found in the course directory, in file-name order.
    pub fn slide_decks(&self) -> &[PathBuf] {
        &self.decks
    }

    /// Files the loader could not parse at build time.
    pub fn skipped_files(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// The course directory this assistant was built from.
    pub fn course_dir(&self) -> &Path {
        &self.course_dir
    }

    /// Number of chunks in the retrieval index, `0` when disabled.
    pub async fn chunk_count(&self) -> usize {
        match &self.answerer {
            Some(answerer) => answerer.pipeline().chunk_count().await,
            None => 0,
        }
    }
}

/// Builder for constructing a [`CourseAssistant`].
#[derive(Default)]
pub struct CourseAssistantBuilder {
    course_dir: Option<PathBuf>,
    snapshot_dir: Option<PathBuf>,
    config: RetrievalConfig,
    gate: QuestionGate,
    model: Option<Arc<dyn LanguageModel>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    options: GenerationOptions,
}

impl CourseAssistantBuilder {
    /// Set the directory of course files to load and index.
    pub fn course_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.course_dir = Some(dir.into());
        self
    }

    /// Persist the index under this directory and reuse it across runs.
    pub fn snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    /// Set the retrieval configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the question gate.
    pub fn gate(mut self, gate: QuestionGate) -> Self {
        self.gate = gate;
        self
    }

    /// Set the language model used for answering, review, and critique.
    pub fn model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the embedding provider used for indexing and queries.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the sampling options applied to every generation call.
    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Load the course directory and construct the assistant.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::Config`] if `course_dir`, `model`, or
    /// `embedder` is missing, and a loading or indexing error if the
    /// directory cannot be read or the index build fails. An empty course
    /// directory is not an error; it disables question answering.
    pub async fn build(self) -> Result<CourseAssistant> {
        let course_dir = self
            .course_dir
            .ok_or_else(|| AssistError::Config("course directory is required".to_string()))?;
        let model =
            self.model.ok_or_else(|| AssistError::Config("model is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| AssistError::Config("embedder is required".to_string()))?;

        // 1. Load the course material.
        let outcome = DocumentLoader::new().load_dir(&course_dir)?;
        let decks = find_decks(&course_dir)?;

        // 2. Build or reopen the retrieval index, unless there is nothing to index.
        let answerer = if outcome.documents.is_empty() {
            warn!(dir = %course_dir.display(), "no documents loaded, question answering disabled");
            None
        } else {
            let chunker = Arc::new(ParagraphChunker::from_config(&self.config));
            let pipeline = RetrievalPipeline::open_or_build(
                self.config,
                chunker,
                embedder,
                self.snapshot_dir.as_deref(),
                &outcome.documents,
            )
            .await?;
            info!(chunk_count = pipeline.chunk_count().await, "course index ready");
            Some(
                GroundedAnswerer::new(Arc::new(pipeline), Arc::clone(&model))
                    .with_options(self.options.clone()),
            )
        };

        // 3. Review and critique need only the model.
        let review =
            ReviewQuestionGenerator::new(Arc::clone(&model)).with_options(self.options.clone());
        let critic = ArgumentCritic::new(model).with_options(self.options);

        Ok(CourseAssistant {
            gate: self.gate,
            answerer,
            review,
            critic,
            course_dir,
            decks,
            skipped: outcome.skipped,
        })
    }
}

fn deck_scan_error(dir: &Path, e: std::io::Error) -> AssistError {
    AssistError::Rag(lectern_rag::RagError::LoadError {
        path: dir.display().to_string(),
        message: format!("failed to scan for decks: {e}"),
    })
}

fn find_decks(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| deck_scan_error(dir, e))?;

    let mut decks: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| deck_scan_error(dir, e))?;
        let path = entry.path();
        let is_deck = path.is_file()
            && path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase() == "pptx")
                .unwrap_or(false);
        if is_deck {
            decks.push(path);
        }
    }
    decks.sort();
    Ok(decks)
}
