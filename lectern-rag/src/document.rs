//! Data types for documents, chunks, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One logical unit of source text with provenance metadata.
///
/// Produced by the document loader, one or more per file: PDFs yield one
/// document per page and slide decks one per slide, so provenance stays
/// fine-grained. The `metadata` map carries at least `source_file` and
/// `source_format`, plus `page` or `slide` where applicable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Identifier, unique within one corpus (derived from the file name).
    pub id: String,
    /// Full text of this unit.
    pub text: String,
    /// Provenance fields, string-keyed and string-valued.
    pub metadata: HashMap<String, String>,
    /// Filesystem path of the file this unit came from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
}

impl Document {
    /// Create a document with the given id and text and empty metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new(), source_path: None }
    }

    /// Attach a metadata entry, consuming and returning the document.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the source path, consuming and returning the document.
    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }
}

/// A retrieval-sized segment of a [`Document`].
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. The chunker
/// leaves `embedding` empty; the pipeline attaches it before indexing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Identifier, unique within one corpus.
    pub id: String,
    /// Normalized text of this segment.
    pub text: String,
    /// Embedding vector, empty until the pipeline fills it in.
    pub embedding: Vec<f32>,
    /// The parent document's metadata plus a `chunk_index` entry.
    pub metadata: HashMap<String, String>,
    /// Identifier of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity against the query, higher is more relevant.
    pub score: f32,
}
