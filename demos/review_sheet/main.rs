//! # Review Sheet Demo
//!
//! Generate open-ended review questions from a PowerPoint deck over Ollama.
//! Needs a running Ollama server with a generation model pulled
//! (`ollama pull mistral`).
//!
//! Run: `cargo run -p lectern-demos --bin review_sheet -- ./slides/week2.pptx [count]`

use std::path::PathBuf;
use std::sync::Arc;

use lectern_assist::{DEFAULT_QUESTION_COUNT, ReviewQuestionGenerator};
use lectern_model::OllamaClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let deck = match args.next() {
        Some(path) => PathBuf::from(path),
        None => anyhow::bail!("usage: review_sheet <deck.pptx> [count]"),
    };
    let count = match args.next() {
        Some(raw) => raw.parse()?,
        None => DEFAULT_QUESTION_COUNT,
    };

    let generator = ReviewQuestionGenerator::new(Arc::new(OllamaClient::new()?));

    println!("Generating {count} review questions from '{}'...\n", deck.display());
    let sheet = generator.generate_for_deck(&deck, count).await;

    if sheet.failed {
        anyhow::bail!("{}", sheet.text);
    }
    for question in sheet.questions() {
        println!("{question}");
    }
    Ok(())
}
