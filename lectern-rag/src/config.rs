//! Configuration for the retrieval pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Minimum chunk length in characters. Shorter spans are discarded
    /// during chunking (they are typically headers or noise).
    pub min_chunk_chars: usize,
    /// Optional upper bound on chunk length in characters. Oversized
    /// paragraph spans are re-split at sentence boundaries. `None` leaves
    /// chunk length unbounded.
    pub max_chunk_chars: Option<usize>,
    /// How many search results a query returns.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { min_chunk_chars: 50, max_chunk_chars: None, top_k: 4 }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the minimum chunk length in characters.
    pub fn min_chunk_chars(mut self, chars: usize) -> Self {
        self.config.min_chunk_chars = chars;
        self
    }

    /// Set an upper bound on chunk length in characters.
    pub fn max_chunk_chars(mut self, chars: usize) -> Self {
        self.config.max_chunk_chars = Some(chars);
        self
    }

    /// Set how many search results a query returns.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`RetrievalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `min_chunk_chars == 0`
    /// - `max_chunk_chars <= min_chunk_chars`
    /// - `top_k == 0`
    pub fn build(self) -> Result<RetrievalConfig> {
        if self.config.min_chunk_chars == 0 {
            return Err(RagError::ConfigError(
                "min_chunk_chars must be greater than zero".to_string(),
            ));
        }
        if let Some(max) = self.config.max_chunk_chars {
            if max <= self.config.min_chunk_chars {
                return Err(RagError::ConfigError(format!(
                    "max_chunk_chars ({max}) must be greater than min_chunk_chars ({})",
                    self.config.min_chunk_chars
                )));
            }
        }
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
