//! # Course QA Demo
//!
//! Index a local course directory and answer questions interactively over
//! Ollama. Needs a running Ollama server with an embedding model and a
//! generation model pulled:
//!
//! ```text
//! ollama pull all-minilm
//! ollama pull mistral
//! ```
//!
//! Run: `cargo run -p lectern-demos --bin course_qa -- ./course [snapshot-dir]`
//!
//! With a snapshot directory the index is persisted and reused on the next
//! start, so the course is only re-embedded after it changes models.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use lectern_assist::{CourseAssistant, QuestionGate, Reply};
use lectern_model::OllamaClient;
use lectern_rag::OllamaEmbeddingProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let course_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => anyhow::bail!("usage: course_qa <course-dir> [snapshot-dir]"),
    };
    let snapshot_dir = args.next().map(PathBuf::from);

    // -- 1. Wire the Ollama backends --------------------------------------
    let embedder = Arc::new(OllamaEmbeddingProvider::new()?);
    let model = Arc::new(OllamaClient::new()?);

    // -- 2. Build the assistant over the course directory ------------------
    let gate = QuestionGate::new()
        .block("what is the answer to question 3 on the midterm")
        .with_override("when are office hours", "Office hours are Tuesdays at 3pm in room 204.");

    let mut builder = CourseAssistant::builder()
        .course_dir(&course_dir)
        .gate(gate)
        .model(model)
        .embedder(embedder);
    if let Some(dir) = snapshot_dir {
        builder = builder.snapshot_dir(dir);
    }
    let assistant = builder.build().await?;

    if !assistant.is_ready() {
        anyhow::bail!("no readable documents in '{}'", course_dir.display());
    }
    println!("Indexed {} chunk(s) from '{}'", assistant.chunk_count().await, course_dir.display());
    for skipped in assistant.skipped_files() {
        println!("  skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    for deck in assistant.slide_decks() {
        println!("  deck: {}", deck.display());
    }

    // -- 3. Interactive question loop -------------------------------------
    println!("\nAsk about the course material (empty line or 'exit' to quit).");
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("question> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() || question == "exit" {
            break;
        }

        match assistant.ask(question).await {
            Some(Reply::Refused(message)) | Some(Reply::Canned(message)) => {
                println!("{message}\n");
            }
            Some(Reply::Answer(answer)) => {
                println!("{}\n", answer.text);
                for source in &answer.sources {
                    println!(
                        "  source [score={:.4}] {}",
                        source.score, source.chunk.document_id
                    );
                }
                println!();
            }
            None => break,
        }
    }

    Ok(())
}
