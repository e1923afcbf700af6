//! # Assistant Basic Demo
//!
//! The full answering flow with **zero API keys**: inline course documents,
//! the deterministic mock embedder, and a mock language model. Shows the
//! question gate (refusals and canned answers), grounded answering with
//! source attribution, and a debate critique.
//!
//! Run: `cargo run -p lectern-demos --bin assistant_basic`

use std::sync::Arc;

use lectern_assist::{ArgumentCritic, GateDecision, GroundedAnswerer, QuestionGate, REFUSAL_MESSAGE};
use lectern_model::MockLlm;
use lectern_rag::{
    Document, InMemoryIndex, MockEmbeddingProvider, ParagraphChunker, RetrievalConfig,
    RetrievalPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // -- 1. Configure retrieval -------------------------------------------
    // top_k=2 keeps the context small for this demo; the default 50-char
    // minimum chunk length drops headers and noise.
    let config = RetrievalConfig::builder().top_k(2).build()?;

    // -- 2. Build the pipeline with offline components --------------------
    // MockEmbeddingProvider hashes words into buckets, so retrieval order
    // follows word overlap. InMemoryIndex keeps everything in memory.
    let pipeline = Arc::new(
        RetrievalPipeline::builder()
            .config(config.clone())
            .chunker(Arc::new(ParagraphChunker::from_config(&config)))
            .embedder(Arc::new(MockEmbeddingProvider::default()))
            .index(Arc::new(InMemoryIndex::new()))
            .build()?,
    );

    // -- 3. Index sample course material ----------------------------------
    let documents = vec![
        Document::new(
            "syllabus",
            "Welcome to Introductory Biology. The midterm exam is in week six and \
             covers everything through cellular respiration. Office hours are held \
             every Tuesday afternoon in room 204.",
        ),
        Document::new(
            "photosynthesis",
            "Photosynthesis converts light energy into chemical energy that plants \
             store as sugar molecules. The light reactions run in the thylakoid \
             membranes and the Calvin cycle runs in the stroma.",
        ),
        Document::new(
            "respiration",
            "Cellular respiration releases the energy stored in sugars. The \
             mitochondria produce ATP through the electron transport chain and are \
             called the powerhouse of the cell.",
        ),
    ];

    println!("Indexing {} documents...", documents.len());
    let chunk_count = pipeline.rebuild(&documents).await?;
    println!("  {} chunk(s) indexed\n", chunk_count);

    // -- 4. Set up the gate and the answerer ------------------------------
    // The blocklist refuses quiz material even under rewording; the
    // override answers a routine question without touching the model.
    let gate = QuestionGate::new()
        .block("what is the answer to question 3 on the midterm")
        .with_override("when are office hours", "Office hours are Tuesdays at 3pm in room 204.");

    let model = Arc::new(MockLlm::new(
        "Photosynthesis stores light energy in sugar molecules; see the week-two slides.",
    ));
    let answerer = GroundedAnswerer::new(Arc::clone(&pipeline), model);

    // -- 5. Ask gated questions -------------------------------------------
    let questions = [
        "What's the answer to Q3 on the midterm?",
        "When are office hours?",
        "How do plants convert light into chemical energy?",
    ];

    for question in &questions {
        println!("Question: \"{question}\"");
        match gate.check(question) {
            GateDecision::Blocked => println!("  {REFUSAL_MESSAGE}"),
            GateDecision::Canned(answer) => println!("  {answer}"),
            GateDecision::Pass => {
                let answer = answerer.answer(question).await;
                println!("  {}", answer.text);
                for source in &answer.sources {
                    println!(
                        "    [score={:.4}] {} | {}",
                        source.score,
                        source.chunk.document_id,
                        &source.chunk.text[..source.chunk.text.len().min(60)],
                    );
                }
            }
        }
        println!();
    }

    // -- 6. Critique a debate argument ------------------------------------
    let critic = ArgumentCritic::new(Arc::new(MockLlm::new(
        "Clear claim, but add evidence for the cost figures and anticipate the \
         fairness counterargument.",
    )));
    let critique = critic
        .critique("School uniforms should be mandatory because they reduce clothing costs.")
        .await;
    println!("Debate feedback: {}", critique.text);

    println!("\n(Model output above is mocked; wire OllamaClient from lectern-model for real generation.)");
    Ok(())
}
