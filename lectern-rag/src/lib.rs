//! # lectern-rag
//!
//! Document retrieval for course materials: load → chunk → embed → search.
//!
//! ## Overview
//!
//! This crate turns a directory of lecture files into a searchable vector
//! index and answers similarity queries over it:
//!
//! - [`DocumentLoader`] - extracts text from PDF, Word, and PowerPoint files
//! - [`ParagraphChunker`] - splits documents on blank lines into retrieval spans
//! - [`EmbeddingProvider`] - maps text to vectors (mock, Ollama, or OpenAI)
//! - [`VectorIndex`] - cosine-similarity search ([`InMemoryIndex`], [`SnapshotIndex`])
//! - [`RetrievalPipeline`] - wires the pieces together
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lectern_rag::{
//!     DocumentLoader, InMemoryIndex, MockEmbeddingProvider, ParagraphChunker,
//!     RetrievalConfig, RetrievalPipeline,
//! };
//!
//! let outcome = DocumentLoader::new().load_dir("./course")?;
//!
//! let pipeline = RetrievalPipeline::builder()
//!     .config(RetrievalConfig::default())
//!     .chunker(Arc::new(ParagraphChunker::default()))
//!     .embedder(Arc::new(MockEmbeddingProvider::default()))
//!     .index(Arc::new(InMemoryIndex::new()))
//!     .build()?;
//!
//! pipeline.rebuild(&outcome.documents).await?;
//! let results = pipeline.query("when is the midterm?").await?;
//! ```
//!
//! ## Persistence
//!
//! [`SnapshotIndex`] keeps the in-memory behavior but writes every rebuilt
//! index to disk, and [`RetrievalPipeline::open_or_build`] reuses a snapshot
//! on startup when its embedding-model fingerprint still matches.
//!
//! ## Features
//!
//! - `ollama` - embeddings from a local Ollama server
//! - `openai` - embeddings from the OpenAI API

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod inmemory;
pub mod loader;
pub mod mock;
#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod snapshot;

pub use chunking::{Chunker, ParagraphChunker};
pub use config::{RetrievalConfig, RetrievalConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::VectorIndex;
pub use inmemory::InMemoryIndex;
pub use loader::{DocumentLoader, FormatReader, LoadOutcome, SkippedFile};
pub use mock::MockEmbeddingProvider;
#[cfg(feature = "ollama")]
pub use ollama::OllamaEmbeddingProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{RetrievalPipeline, RetrievalPipelineBuilder};
pub use snapshot::SnapshotIndex;
