//! Review-question generation from slide decks.
//!
//! Instructors point [`ReviewQuestionGenerator`] at a `.pptx` deck and get
//! back a numbered list of open-ended review questions for students. Slide
//! text goes into the prompt with its original slide numbers so questions
//! can reference "slide 7" meaningfully even when earlier slides were
//! empty.

use std::path::Path;
use std::sync::Arc;

use lectern_model::{GenerationOptions, GenerationRequest, LanguageModel};
use lectern_rag::loader::read_slide_texts;
use tracing::{info, warn};

/// The fixed reply shown when generation fails.
pub const REVIEW_FAILURE_MESSAGE: &str = "❌ Failed to generate review questions.";

/// The fixed reply for decks with no readable slide text.
pub const EMPTY_DECK_MESSAGE: &str = "⚠️ No readable text found in slides.";

/// Number of questions requested when the caller does not choose.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// At most this many slides are folded into the prompt.
pub const MAX_SLIDES: usize = 15;

/// A generated sheet of review questions.
///
/// `failed` is set when the deck was unreadable, had no text, or the model
/// errored; `text` then holds a marked message instead of questions.
#[derive(Debug, Clone)]
pub struct ReviewSheet {
    /// The model's question list, or a marked failure message.
    pub text: String,
    /// True when this is a failure reply instead of model output.
    pub failed: bool,
}

impl ReviewSheet {
    fn failure(message: &str) -> Self {
        Self { text: message.to_string(), failed: true }
    }

    /// The individual questions: trimmed, non-empty lines of the text.
    pub fn questions(&self) -> Vec<&str> {
        self.text.lines().map(str::trim).filter(|line| !line.is_empty()).collect()
    }
}

fn slide_lines(slides: &[(usize, String)]) -> Vec<String> {
    slides
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .take(MAX_SLIDES)
        .map(|(number, text)| format!("Slide {number}: {}", text.replace('\n', " ")))
        .collect()
}

fn compose_prompt(lines: &[String], count: usize) -> String {
    format!(
        "Generate {count} open-ended review questions for students based on this PowerPoint \
         content.\n\n{}\n\nOnly list the questions. No answers.",
        lines.join("\n")
    )
}

/// Turns slide decks into open-ended review questions via a language model.
pub struct ReviewQuestionGenerator {
    model: Arc<dyn LanguageModel>,
    options: GenerationOptions,
}

impl ReviewQuestionGenerator {
    /// Create a generator backed by the given model.
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model, options: GenerationOptions::default() }
    }

    /// Set the sampling options passed to every generation call.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Generate `count` review questions from a `.pptx` deck on disk.
    ///
    /// An unreadable deck is a failure sheet, not an error; like the
    /// answerer, this method always has something to display.
    pub async fn generate_for_deck(&self, deck: &Path, count: usize) -> ReviewSheet {
        let slides = match read_slide_texts(deck) {
            Ok(slides) => slides,
            Err(e) => {
                warn!(deck = %deck.display(), error = %e, "failed to read deck");
                return ReviewSheet::failure(REVIEW_FAILURE_MESSAGE);
            }
        };
        self.generate(&slides, count).await
    }

    /// Generate `count` review questions from extracted slide texts.
    ///
    /// Slides are `(slide_number, text)` pairs as produced by
    /// [`read_slide_texts`]; empty slides are skipped and at most
    /// [`MAX_SLIDES`] slides with text are sent to the model. A deck with
    /// no readable text short-circuits to [`EMPTY_DECK_MESSAGE`] without
    /// calling the model.
    pub async fn generate(&self, slides: &[(usize, String)], count: usize) -> ReviewSheet {
        let lines = slide_lines(slides);
        if lines.is_empty() {
            return ReviewSheet::failure(EMPTY_DECK_MESSAGE);
        }

        let request = GenerationRequest::new(compose_prompt(&lines, count))
            .with_options(self.options.clone());

        match self.model.generate(request).await {
            Ok(text) => {
                info!(slide_count = lines.len(), count, "generated review questions");
                ReviewSheet { text, failed: false }
            }
            Err(e) => {
                warn!(error = %e, "review question generation failed");
                ReviewSheet::failure(REVIEW_FAILURE_MESSAGE)
            }
        }
    }
}
