//! The embedding boundary: text in, fixed-length vector out.

use async_trait::async_trait;

use crate::error::Result;

/// Maps text to a fixed-length vector for similarity comparison.
///
/// This is the swap surface for embedding backends: the rest of the crate
/// sees only [`dimensions`](EmbeddingProvider::dimensions) and
/// [`model_id`](EmbeddingProvider::model_id), so exchanging one provider
/// for another touches nothing else. Same input, same model, same vector
/// is assumed, not enforced.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::EmbeddingProvider;
///
/// let vector = provider.embed("photosynthesis converts light").await?;
/// assert_eq!(vector.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, one vector per input, in input order.
    ///
    /// The default falls back to sequential
    /// [`embed`](EmbeddingProvider::embed) calls; backends with a native
    /// batch endpoint should override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Dimensionality of every vector this provider emits.
    fn dimensions(&self) -> usize;

    /// Identifier of the underlying embedding model.
    ///
    /// Recorded in index snapshots so a reload can detect that the corpus
    /// was embedded by a different model than the one now active.
    fn model_id(&self) -> &str;
}
