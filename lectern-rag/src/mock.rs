//! Deterministic mock embedding provider for tests and demos.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// A deterministic [`EmbeddingProvider`] that needs no model or network.
///
/// Each word of the input is hashed into one of `dimensions` buckets and
/// the resulting count vector is L2-normalized, so texts sharing words
/// score higher under cosine similarity than unrelated texts. Good enough
/// for tests and offline demos where retrieval order should follow word
/// overlap; not a substitute for a real embedding model.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
    model_id: String,
}

impl MockEmbeddingProvider {
    /// Create a provider emitting vectors of the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions, model_id: "mock-embedding".to_string() }
    }

    /// Override the reported model identifier.
    ///
    /// Useful in tests that exercise snapshot fingerprint mismatches.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new(64)
    }
}

fn word_hash(word: &str) -> u64 {
    word.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0f32; self.dimensions];
        for word in text.to_lowercase().split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            let bucket = (word_hash(word) % self.dimensions as u64) as usize;
            embedding[bucket] += 1.0;
        }

        // L2-normalize so cosine similarity is just the dot product.
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
