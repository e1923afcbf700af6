//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and [`ParagraphChunker`], a
//! boundary detector that splits documents on blank lines and normalizes
//! each paragraph span into one retrieval-sized chunk.

use crate::config::RetrievalConfig;
use crate::document::{Chunk, Document};

/// A strategy for turning one [`Document`] into retrieval-sized [`Chunk`]s.
///
/// Chunkers are pure text transforms: the chunks they return carry text
/// and provenance metadata, and the pipeline attaches embeddings
/// afterward.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// An empty document yields an empty `Vec`.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text at blank-line boundaries into paragraph-level chunks.
///
/// Each paragraph span is normalized by trimming every line and rejoining
/// the non-empty lines with single newlines, which collapses bullet lists
/// and wrapped lines into one coherent chunk. Spans shorter than
/// `min_chars` (counted in characters after normalization) are discarded
/// as headers or noise. Chunk length is unbounded above unless
/// `max_chars` is set, in which case oversized spans are re-split at line,
/// then sentence, then word boundaries.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk
/// inherits the parent document's metadata plus a `chunk_index` field.
///
/// # Example
///
/// ```rust,ignore
/// use lectern_rag::ParagraphChunker;
///
/// let chunker = ParagraphChunker::new(50);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    min_chars: usize,
    max_chars: Option<usize>,
}

impl Default for ParagraphChunker {
    fn default() -> Self {
        Self { min_chars: 50, max_chars: None }
    }
}

impl ParagraphChunker {
    /// Create a new `ParagraphChunker` with the given minimum chunk length.
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars, max_chars: None }
    }

    /// Create a chunker from the chunking fields of a [`RetrievalConfig`].
    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self { min_chars: config.min_chunk_chars, max_chars: config.max_chunk_chars }
    }

    /// Set an upper bound on chunk length in characters.
    ///
    /// Oversized paragraph spans are re-split at line, sentence, and
    /// finally word boundaries. A single word longer than the bound is
    /// emitted as-is rather than cut mid-word.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }
}

/// Normalize a paragraph span: trim each line and rejoin the non-empty
/// lines with single newlines.
fn group_lines(span: &str) -> String {
    span.lines().map(str::trim).filter(|line| !line.is_empty()).collect::<Vec<_>>().join("\n")
}

/// Split text at a separator, keeping the separator attached to the piece
/// before it.
fn split_after<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(separator) {
        let (segment, tail) = rest.split_at(pos + separator.len());
        segments.push(segment);
        rest = tail;
    }
    if !rest.is_empty() {
        segments.push(rest);
    }
    segments
}

/// Emit one merged piece, re-splitting it at the next-finer separator if
/// it still exceeds the bound.
fn push_piece(
    piece: String,
    piece_chars: usize,
    max_chars: usize,
    finer: &[&str],
    out: &mut Vec<String>,
) {
    if piece_chars > max_chars {
        out.extend(split_and_merge(&piece, max_chars, finer));
    } else {
        out.push(piece);
    }
}

/// Split text at the coarsest separator, then greedily merge adjacent
/// segments into pieces of at most `max_chars` characters. Pieces that a
/// single segment already overflows fall through to the finer separators.
fn split_and_merge(text: &str, max_chars: usize, separators: &[&str]) -> Vec<String> {
    let Some((separator, finer)) = separators.split_first() else {
        return vec![text.to_string()];
    };
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let segments = split_after(text, separator);
    if segments.len() < 2 {
        return split_and_merge(text, max_chars, finer);
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for segment in segments {
        let segment_chars = segment.chars().count();
        if current.is_empty() || current_chars + segment_chars <= max_chars {
            current.push_str(segment);
            current_chars += segment_chars;
        } else {
            push_piece(std::mem::take(&mut current), current_chars, max_chars, finer, &mut pieces);
            current.push_str(segment);
            current_chars = segment_chars;
        }
    }
    if !current.is_empty() {
        push_piece(current, current_chars, max_chars, finer, &mut pieces);
    }

    pieces
}

fn make_chunk(document: &Document, index: usize, text: &str) -> Chunk {
    let mut metadata = document.metadata.clone();
    metadata.insert("chunk_index".to_string(), index.to_string());

    Chunk {
        id: format!("{}_{index}", document.id),
        text: text.to_string(),
        embedding: Vec::new(),
        metadata,
        document_id: document.id.clone(),
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut chunk_index = 0;

        for span in document.text.split("\n\n") {
            let grouped = group_lines(span);
            if grouped.chars().count() < self.min_chars {
                continue;
            }

            let pieces = match self.max_chars {
                Some(max) if grouped.chars().count() > max => {
                    let separators = ["\n", ". ", "! ", "? ", " "];
                    split_and_merge(&grouped, max, &separators)
                }
                _ => vec![grouped],
            };

            for piece in pieces {
                let text = piece.trim_end();
                if text.chars().count() < self.min_chars {
                    continue;
                }
                chunks.push(make_chunk(document, chunk_index, text));
                chunk_index += 1;
            }
        }

        chunks
    }
}
