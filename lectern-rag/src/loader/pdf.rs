//! PDF reader producing one document per page.

use std::path::Path;

use super::{FormatReader, file_name, file_stem, load_error};
use crate::document::Document;
use crate::error::Result;

/// Reads `.pdf` files via `pdf-extract`, emitting one [`Document`] per
/// non-blank page with the page number in metadata.
pub struct PdfReader;

impl FormatReader for PdfReader {
    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn read(&self, path: &Path) -> Result<Vec<Document>> {
        let pages = pdf_extract::extract_text_by_pages(path)
            .map_err(|e| load_error(path, format!("failed to extract text: {e}")))?;

        let stem = file_stem(path);
        let name = file_name(path);
        let mut documents = Vec::new();

        for (i, text) in pages.into_iter().enumerate() {
            let page = i + 1;
            if text.trim().is_empty() {
                continue;
            }
            documents.push(
                Document::new(format!("{stem}_p{page}"), text)
                    .with_metadata("source_file", name.clone())
                    .with_metadata("source_format", "pdf")
                    .with_metadata("page", page.to_string())
                    .with_source_path(path.display().to_string()),
            );
        }
        Ok(documents)
    }
}
