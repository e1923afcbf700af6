//! Vector index trait for storing and searching chunk embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A nearest-neighbor index over embedded chunks.
///
/// Mutation is batch-only: the whole corpus is swapped at once via
/// [`replace_all`](VectorIndex::replace_all) and there is no incremental
/// single-chunk update. Any change to the corpus is a full rebuild.
/// Concurrent [`search`](VectorIndex::search) calls against one index are
/// safe; a replacement becomes visible atomically and callers already
/// searching keep the state they started with.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::{InMemoryIndex, VectorIndex};
///
/// let index = InMemoryIndex::new();
/// index.replace_all(chunks).await?;
/// let results = index.search(&query_embedding, 4).await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Replace the entire contents of the index with the given chunks.
    ///
    /// Chunks must have embeddings set. Insertion order is preserved and
    /// breaks score ties at search time.
    async fn replace_all(&self, chunks: Vec<Chunk>) -> Result<()>;

    /// Search for the `top_k` most similar chunks to the given embedding.
    ///
    /// Returns results ordered by descending similarity score, ties broken
    /// by insertion order. An empty index yields an empty result, not an
    /// error.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Return the number of chunks currently held.
    async fn chunk_count(&self) -> usize;
}
