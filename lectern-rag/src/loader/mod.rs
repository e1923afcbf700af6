//! Document loading from a directory of uploaded course files.
//!
//! [`DocumentLoader`] dispatches by file extension to a [`FormatReader`].
//! Built-in readers cover PDF (one document per page), DOCX (one per
//! file), and PPTX (one per slide). Unsupported extensions are skipped
//! silently; a reader failure on one file is recorded in the outcome and
//! never aborts the batch, so a single bad upload cannot block access to
//! the rest of the material.

mod docx;
mod ooxml;
mod pdf;
mod pptx;

pub use docx::DocxReader;
pub use pdf::PdfReader;
pub use pptx::{PptxReader, read_slide_texts};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::document::Document;
use crate::error::{RagError, Result};

/// A reader for one document format.
///
/// Readers are synchronous: parsing happens on local files during the
/// build phase, not on a query path.
pub trait FormatReader: Send + Sync {
    /// The lower-case file extensions this reader handles, without dots.
    fn extensions(&self) -> &[&str];

    /// Read a file into one or more documents.
    fn read(&self, path: &Path) -> Result<Vec<Document>>;
}

/// A file that failed to load during a directory walk, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    /// Path of the file that was skipped.
    pub path: PathBuf,
    /// Human-readable reason it was skipped.
    pub reason: String,
}

/// The outcome of loading a directory: parsed documents plus any files
/// that failed to parse.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Documents from every file that parsed successfully.
    pub documents: Vec<Document>,
    /// Files that failed to parse, in the order they were encountered.
    pub skipped: Vec<SkippedFile>,
}

/// Loads course files by dispatching on file extension.
pub struct DocumentLoader {
    readers: HashMap<String, Arc<dyn FormatReader>>,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    /// Create a loader with the built-in PDF, DOCX, and PPTX readers.
    pub fn new() -> Self {
        Self::empty()
            .with_reader(Arc::new(PdfReader))
            .with_reader(Arc::new(DocxReader))
            .with_reader(Arc::new(PptxReader))
    }

    /// Create a loader with no readers registered.
    pub fn empty() -> Self {
        Self { readers: HashMap::new() }
    }

    /// Register a reader, replacing any reader already claiming its extensions.
    pub fn with_reader(mut self, reader: Arc<dyn FormatReader>) -> Self {
        for ext in reader.extensions() {
            self.readers.insert((*ext).to_string(), Arc::clone(&reader));
        }
        self
    }

    /// The file extensions this loader recognizes, sorted.
    pub fn supported_extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.readers.keys().cloned().collect();
        extensions.sort();
        extensions
    }

    /// Load a single file, dispatching on its extension.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::LoadError`] if the extension is unsupported or
    /// the reader fails.
    pub fn load_file(&self, path: &Path) -> Result<Vec<Document>> {
        let ext = extension_of(path)
            .ok_or_else(|| load_error(path, "file has no extension".to_string()))?;
        let reader = self
            .readers
            .get(&ext)
            .ok_or_else(|| load_error(path, format!("unsupported extension '.{ext}'")))?;
        reader.read(path)
    }

    /// Load every supported file in a directory.
    ///
    /// Entries are visited in file-name order so document insertion order
    /// is deterministic across runs. Subdirectories and unsupported
    /// extensions are skipped silently. A reader failure on one file is
    /// logged and recorded in [`LoadOutcome::skipped`]; the batch continues.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::LoadError`] only if the directory itself cannot
    /// be read.
    pub fn load_dir(&self, dir: &Path) -> Result<LoadOutcome> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| load_error(dir, format!("failed to read directory: {e}")))?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| load_error(dir, format!("failed to read directory entry: {e}")))?;
            paths.push(entry.path());
        }
        paths.sort();

        let mut outcome = LoadOutcome::default();
        for path in paths {
            if !path.is_file() {
                continue;
            }
            let Some(ext) = extension_of(&path) else {
                continue;
            };
            let Some(reader) = self.readers.get(&ext) else {
                debug!(path = %path.display(), "skipping unsupported extension");
                continue;
            };

            match reader.read(&path) {
                Ok(documents) => {
                    debug!(path = %path.display(), document_count = documents.len(), "loaded file");
                    outcome.documents.extend(documents);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load file, continuing");
                    outcome.skipped.push(SkippedFile { path, reason: e.to_string() });
                }
            }
        }

        info!(
            dir = %dir.display(),
            document_count = outcome.documents.len(),
            skipped_count = outcome.skipped.len(),
            "loaded course directory"
        );
        Ok(outcome)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
}

pub(crate) fn load_error(path: &Path, message: String) -> RagError {
    RagError::LoadError { path: path.display().to_string(), message }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
