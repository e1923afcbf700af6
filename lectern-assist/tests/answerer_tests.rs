//! Tests for grounded answering: prompt composition, source attribution,
//! and the never-error failure policy.

use std::sync::Arc;

use async_trait::async_trait;
use lectern_assist::{ANSWER_FAILURE_MESSAGE, GROUNDING_INSTRUCTION, GroundedAnswerer};
use lectern_model::{GenerationOptions, MockLlm};
use lectern_rag::{
    Document, EmbeddingProvider, InMemoryIndex, MockEmbeddingProvider, ParagraphChunker, RagError,
    RetrievalConfig, RetrievalPipeline,
};

const QUERY: &str = "How do plants convert light into chemical energy?";

fn corpus() -> Vec<Document> {
    vec![
        Document::new(
            "plants",
            "Photosynthesis converts light energy into chemical energy that plants store as sugar molecules.",
        ),
        Document::new(
            "cells",
            "The mitochondria of the cell produce energy by respiration and are called the powerhouse of the cell.",
        ),
        Document::new(
            "history",
            "The French Revolution began in 1789 and transformed the politics of Europe for decades afterward.",
        ),
    ]
}

async fn indexed_pipeline() -> Arc<RetrievalPipeline> {
    let pipeline = RetrievalPipeline::builder()
        .config(RetrievalConfig::default())
        .chunker(Arc::new(ParagraphChunker::default()))
        .embedder(Arc::new(MockEmbeddingProvider::default()))
        .index(Arc::new(InMemoryIndex::new()))
        .build()
        .unwrap();
    pipeline.rebuild(&corpus()).await.unwrap();
    Arc::new(pipeline)
}

/// An embedding provider whose backend is always down.
struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> lectern_rag::Result<Vec<f32>> {
        Err(RagError::EmbeddingError {
            provider: "test".to_string(),
            message: "backend offline".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        64
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

#[tokio::test]
async fn answer_composes_a_grounded_prompt_from_ranked_sources() {
    let model = Arc::new(MockLlm::new("Plants use photosynthesis."));
    let answerer = GroundedAnswerer::new(indexed_pipeline().await, model.clone());

    let answer = answerer.answer(QUERY).await;

    assert!(!answer.failed);
    assert_eq!(answer.text, "Plants use photosynthesis.");
    let ids: Vec<&str> = answer.sources.iter().map(|s| s.chunk.id.as_str()).collect();
    assert_eq!(ids, vec!["plants_0", "cells_0", "history_0"]);

    let requests = model.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system.as_deref(), Some(GROUNDING_INSTRUCTION));

    // Context carries the retrieved chunks best-first, then the verbatim question.
    let docs = corpus();
    let expected = format!(
        "Context:\n{}\n\n{}\n\n{}\n\nQuestion: {QUERY}\nAnswer:",
        docs[0].text, docs[1].text, docs[2].text
    );
    assert_eq!(requests[0].prompt, expected);
}

#[tokio::test]
async fn top_k_override_narrows_the_context() {
    let model = Arc::new(MockLlm::new("Plants use photosynthesis."));
    let answerer = GroundedAnswerer::new(indexed_pipeline().await, model.clone()).with_top_k(1);

    let answer = answerer.answer(QUERY).await;

    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].chunk.id, "plants_0");

    let requests = model.requests().await;
    assert!(requests[0].prompt.contains("Photosynthesis"));
    assert!(!requests[0].prompt.contains("mitochondria"));
}

#[tokio::test]
async fn options_flow_into_the_generation_request() {
    let model = Arc::new(MockLlm::new("ok"));
    let answerer = GroundedAnswerer::new(indexed_pipeline().await, model.clone())
        .with_options(GenerationOptions::default().with_temperature(0.5));

    answerer.answer(QUERY).await;

    let requests = model.requests().await;
    assert_eq!(requests[0].options.temperature, Some(0.5));
}

#[tokio::test]
async fn generation_failure_keeps_the_retrieved_sources() {
    let model = Arc::new(MockLlm::failing());
    let answerer = GroundedAnswerer::new(indexed_pipeline().await, model.clone());

    let answer = answerer.answer(QUERY).await;

    assert!(answer.failed);
    assert_eq!(answer.text, ANSWER_FAILURE_MESSAGE);
    // The caller can still show what was retrieved.
    assert_eq!(answer.sources.len(), 3);
    assert_eq!(answer.sources[0].chunk.id, "plants_0");
    assert_eq!(model.request_count().await, 1);
}

#[tokio::test]
async fn retrieval_failure_never_reaches_the_model() {
    let pipeline = RetrievalPipeline::builder()
        .config(RetrievalConfig::default())
        .chunker(Arc::new(ParagraphChunker::default()))
        .embedder(Arc::new(FailingEmbedder))
        .index(Arc::new(InMemoryIndex::new()))
        .build()
        .unwrap();
    let model = Arc::new(MockLlm::new("unused"));
    let answerer = GroundedAnswerer::new(Arc::new(pipeline), model.clone());

    let answer = answerer.answer(QUERY).await;

    assert!(answer.failed);
    assert_eq!(answer.text, ANSWER_FAILURE_MESSAGE);
    assert!(answer.sources.is_empty());
    assert_eq!(model.request_count().await, 0);
}

#[tokio::test]
async fn empty_index_still_asks_the_model_with_empty_context() {
    let pipeline = RetrievalPipeline::builder()
        .config(RetrievalConfig::default())
        .chunker(Arc::new(ParagraphChunker::default()))
        .embedder(Arc::new(MockEmbeddingProvider::default()))
        .index(Arc::new(InMemoryIndex::new()))
        .build()
        .unwrap();
    let model = Arc::new(MockLlm::new("I don't have material on that."));
    let answerer = GroundedAnswerer::new(Arc::new(pipeline), model.clone());

    let answer = answerer.answer(QUERY).await;

    assert!(!answer.failed);
    assert!(answer.sources.is_empty());
    let requests = model.requests().await;
    assert_eq!(requests[0].prompt, format!("Context:\n\n\nQuestion: {QUERY}\nAnswer:"));
}
