//! Error types for the `lectern-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A file could not be read or parsed by a format reader.
    #[error("Load error ({path}): {message}")]
    LoadError {
        /// The path of the file that failed to load.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector index backend.
    #[error("Index error ({backend}): {message}")]
    IndexError {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// No persisted snapshot exists at the given location.
    ///
    /// This is a normal signal to fall back to a fresh build, not a fault.
    #[error("no index snapshot found in '{dir}'")]
    SnapshotNotFound {
        /// The snapshot directory that was probed.
        dir: String,
    },

    /// A persisted snapshot was built with a different embedding model
    /// than the one now active.
    #[error(
        "snapshot was built with embedding model '{snapshot_model}' ({snapshot_dimensions} dims) \
         but the active model is '{active_model}' ({active_dimensions} dims)"
    )]
    SnapshotMismatch {
        /// The model identifier recorded in the snapshot.
        snapshot_model: String,
        /// The embedding dimensionality recorded in the snapshot.
        snapshot_dimensions: usize,
        /// The model identifier of the active embedding provider.
        active_model: String,
        /// The embedding dimensionality of the active provider.
        active_dimensions: usize,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the retrieval pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
