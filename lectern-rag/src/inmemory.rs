//! In-memory vector index using cosine similarity.
//!
//! This module provides [`InMemoryIndex`], a zero-dependency exact index
//! that rescans every chunk per query. It is suitable for development,
//! testing, and course-sized corpora; it does not survive process restarts.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;
use crate::index::VectorIndex;

/// An exact in-memory vector index using cosine similarity for search.
///
/// Chunks are held in insertion order behind an `Arc` swapped under a
/// `tokio::sync::RwLock`. Readers clone the `Arc` and score outside the
/// lock, so a concurrent rebuild never blocks or invalidates an in-flight
/// search: the new corpus becomes visible atomically on completion.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    chunks: RwLock<Arc<Vec<Chunk>>>,
}

impl InMemoryIndex {
    /// Create a new empty in-memory index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine similarity of two vectors, 0.0 when either has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    dot / denominator
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn replace_all(&self, chunks: Vec<Chunk>) -> Result<()> {
        let next = Arc::new(chunks);
        *self.chunks.write().await = next;
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let snapshot = Arc::clone(&*self.chunks.read().await);

        let mut scored = Vec::with_capacity(snapshot.len());
        for chunk in snapshot.iter() {
            let score = cosine_similarity(&chunk.embedding, embedding);
            scored.push(SearchResult { chunk: chunk.clone(), score });
        }

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn chunk_count(&self) -> usize {
        self.chunks.read().await.len()
    }
}
