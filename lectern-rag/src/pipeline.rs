//! Retrieval pipeline orchestrator.
//!
//! The [`RetrievalPipeline`] coordinates the full build-and-query workflow by
//! composing a [`Chunker`], an [`EmbeddingProvider`], and a [`VectorIndex`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lectern_rag::{
//!     InMemoryIndex, MockEmbeddingProvider, ParagraphChunker, RetrievalConfig,
//!     RetrievalPipeline,
//! };
//!
//! let pipeline = RetrievalPipeline::builder()
//!     .config(RetrievalConfig::default())
//!     .chunker(Arc::new(ParagraphChunker::default()))
//!     .embedder(Arc::new(MockEmbeddingProvider::default()))
//!     .index(Arc::new(InMemoryIndex::new()))
//!     .build()?;
//!
//! pipeline.rebuild(&documents).await?;
//! let results = pipeline.query("when is the midterm?").await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::config::RetrievalConfig;
use crate::document::{Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::inmemory::InMemoryIndex;
use crate::snapshot::SnapshotIndex;

/// The retrieval pipeline orchestrator.
///
/// Coordinates index construction (chunk → embed → swap in) and query
/// execution (embed → search). Construct one via
/// [`RetrievalPipeline::builder()`], or via
/// [`RetrievalPipeline::open_or_build()`] to reuse a persisted index.
///
/// All methods take `&self`, so a pipeline can be shared behind an [`Arc`]
/// and queried concurrently while a rebuild is in flight.
pub struct RetrievalPipeline {
    config: RetrievalConfig,
    chunker: Arc<dyn Chunker>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl RetrievalPipeline {
    /// Create a new [`RetrievalPipelineBuilder`].
    pub fn builder() -> RetrievalPipelineBuilder {
        RetrievalPipelineBuilder::default()
    }

    /// Open a persisted index if one is usable, otherwise build from `documents`.
    ///
    /// With `snapshot_dir` set, a snapshot whose model fingerprint matches
    /// `embedder` is reused as-is and `documents` are not re-embedded. A
    /// missing, mismatched, or unreadable snapshot falls back to a full
    /// rebuild that overwrites the snapshot. Without `snapshot_dir` the
    /// pipeline builds a purely in-memory index.
    ///
    /// # Errors
    ///
    /// Returns an error if the fallback rebuild fails; a bad snapshot alone
    /// is never fatal.
    pub async fn open_or_build(
        config: RetrievalConfig,
        chunker: Arc<dyn Chunker>,
        embedder: Arc<dyn EmbeddingProvider>,
        snapshot_dir: Option<&Path>,
        documents: &[Document],
    ) -> Result<Self> {
        let model_id = embedder.model_id().to_string();
        let dimensions = embedder.dimensions();

        let (index, needs_build): (Arc<dyn VectorIndex>, bool) = match snapshot_dir {
            Some(dir) if SnapshotIndex::exists(dir) => {
                match SnapshotIndex::open(dir, &model_id, dimensions).await {
                    Ok(snapshot) => (Arc::new(snapshot), false),
                    Err(RagError::SnapshotMismatch {
                        snapshot_model, snapshot_dimensions, ..
                    }) => {
                        warn!(
                            %snapshot_model,
                            snapshot_dimensions,
                            active_model = %model_id,
                            active_dimensions = dimensions,
                            "snapshot was built by a different embedder, rebuilding"
                        );
                        (Arc::new(SnapshotIndex::new(dir, &model_id, dimensions)), true)
                    }
                    Err(e) => {
                        warn!(directory = %dir.display(), error = %e, "snapshot unreadable, rebuilding");
                        (Arc::new(SnapshotIndex::new(dir, &model_id, dimensions)), true)
                    }
                }
            }
            Some(dir) => (Arc::new(SnapshotIndex::new(dir, &model_id, dimensions)), true),
            None => (Arc::new(InMemoryIndex::new()), true),
        };

        let pipeline = Self::builder()
            .config(config)
            .chunker(chunker)
            .embedder(embedder)
            .index(index)
            .build()?;

        if needs_build {
            pipeline.rebuild(documents).await?;
        } else {
            info!(chunk_count = pipeline.chunk_count().await, "reusing persisted index");
        }

        Ok(pipeline)
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Return a reference to the vector index.
    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Rebuild the index from a document set: chunk → embed → swap in.
    ///
    /// The new chunk set replaces the index contents in one step, so
    /// concurrent queries see either the old index or the new one, never a
    /// partial mix. Returns the number of chunks indexed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or indexing fails,
    /// including the document ID in the error message. On error the index
    /// keeps its previous contents.
    pub async fn rebuild(&self, documents: &[Document]) -> Result<usize> {
        let mut all_chunks = Vec::new();

        for document in documents {
            // 1. Chunk the document
            let mut chunks = self.chunker.chunk(document);
            if chunks.is_empty() {
                info!(document.id = %document.id, chunk_count = 0, "document produced no chunks");
                continue;
            }

            // 2. Collect chunk texts for batch embedding
            let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();

            // 3. Generate embeddings
            let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
                error!(document.id = %document.id, error = %e, "embedding failed during rebuild");
                RagError::PipelineError(format!(
                    "embedding failed for document '{}': {e}",
                    document.id
                ))
            })?;

            // 4. Attach embeddings to chunks
            for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
                chunk.embedding = embedding;
            }

            let chunk_count = chunks.len();
            info!(document.id = %document.id, chunk_count, "embedded document");

            all_chunks.extend(chunks);
        }

        // 5. Swap the new chunk set into the index
        let chunk_count = all_chunks.len();
        self.index.replace_all(all_chunks).await.map_err(|e| {
            error!(error = %e, "index replacement failed during rebuild");
            RagError::PipelineError(format!("index replacement failed: {e}"))
        })?;

        info!(document_count = documents.len(), chunk_count, "rebuilt index");

        Ok(chunk_count)
    }

    /// Query the pipeline with the configured `top_k`: embed → search.
    ///
    /// Returns search results ordered by descending relevance score.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or search fails.
    pub async fn query(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.query_with_top_k(query, self.config.top_k).await
    }

    /// Query the pipeline with an explicit result bound.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or search fails.
    pub async fn query_with_top_k(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        // 1. Embed the query
        let query_embedding = self.embedder.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        // 2. Search the index
        let results = self.index.search(&query_embedding, top_k).await.map_err(|e| {
            error!(error = %e, "index search failed");
            RagError::PipelineError(format!("search failed: {e}"))
        })?;

        info!(result_count = results.len(), "query completed");

        Ok(results)
    }

    /// Return the number of chunks currently indexed.
    pub async fn chunk_count(&self) -> usize {
        self.index.chunk_count().await
    }
}

/// Builder for constructing a [`RetrievalPipeline`].
///
/// All fields are required. Call [`build()`](RetrievalPipelineBuilder::build)
/// to validate and produce the pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = RetrievalPipeline::builder()
///     .config(RetrievalConfig::default())
///     .chunker(Arc::new(chunker))
///     .embedder(Arc::new(embedder))
///     .index(Arc::new(index))
///     .build()?;
/// ```
#[derive(Default)]
pub struct RetrievalPipelineBuilder {
    config: Option<RetrievalConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl RetrievalPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RetrievalConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`RetrievalPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RetrievalPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::ConfigError("chunker is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::ConfigError("embedder is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| RagError::ConfigError("index is required".to_string()))?;

        Ok(RetrievalPipeline { config, chunker, embedder, index })
    }
}
