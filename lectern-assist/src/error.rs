//! Error types for the `lectern-assist` crate.

use thiserror::Error;

/// Errors that can occur while constructing or driving the assistant.
///
/// Runtime answering never returns these: generation and retrieval
/// failures are absorbed into marked failure replies at the answerer
/// boundary. These errors cover construction and corpus loading.
#[derive(Debug, Error)]
pub enum AssistError {
    /// An error from the retrieval layer.
    #[error(transparent)]
    Rag(#[from] lectern_rag::RagError),

    /// An error from the language model layer.
    #[error(transparent)]
    Model(#[from] lectern_model::ModelError),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for assistant operations.
pub type Result<T> = std::result::Result<T, AssistError>;
