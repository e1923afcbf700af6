//! DOCX reader producing one document per file.

use std::path::Path;

use super::{FormatReader, file_name, file_stem, ooxml};
use crate::document::Document;
use crate::error::Result;

/// Reads `.docx` files, emitting one [`Document`] for the whole file.
///
/// Word paragraphs are joined with blank lines so the chunker sees them
/// as separate spans, matching how the text reads in the editor.
pub struct DocxReader;

impl FormatReader for DocxReader {
    fn extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn read(&self, path: &Path) -> Result<Vec<Document>> {
        let xml = ooxml::read_zip_entry(path, "word/document.xml")?;
        let paragraphs = ooxml::collect_paragraph_text(&xml, path, "w:t", "w:p")?;

        let text = paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let document = Document::new(file_stem(path), text)
            .with_metadata("source_file", file_name(path))
            .with_metadata("source_format", "docx")
            .with_source_path(path.display().to_string());
        Ok(vec![document])
    }
}
