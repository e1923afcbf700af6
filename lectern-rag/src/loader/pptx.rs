//! PPTX reader producing one document per slide.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{FormatReader, file_name, file_stem, load_error, ooxml};
use crate::document::Document;
use crate::error::Result;

/// Reads `.pptx` files, emitting one [`Document`] per non-empty slide
/// with the slide number in metadata.
///
/// Within a slide, text paragraphs (titles, bullets) are joined with
/// single newlines so the chunker can group the whole slide into one
/// coherent chunk.
pub struct PptxReader;

impl FormatReader for PptxReader {
    fn extensions(&self) -> &[&str] {
        &["pptx"]
    }

    fn read(&self, path: &Path) -> Result<Vec<Document>> {
        let slides = read_slide_texts(path)?;
        let stem = file_stem(path);
        let name = file_name(path);
        let mut documents = Vec::new();

        for (number, text) in slides {
            if text.trim().is_empty() {
                continue;
            }
            documents.push(
                Document::new(format!("{stem}_s{number}"), text)
                    .with_metadata("source_file", name.clone())
                    .with_metadata("source_format", "pptx")
                    .with_metadata("slide", number.to_string())
                    .with_source_path(path.display().to_string()),
            );
        }
        Ok(documents)
    }
}

/// Extract per-slide text from a deck, in slide order.
///
/// Returns `(slide_number, text)` pairs for every slide in the archive,
/// including empty ones, so callers can preserve the deck's numbering.
/// Paragraphs within a slide are joined with single newlines.
///
/// # Errors
///
/// Returns [`RagError::LoadError`](crate::RagError::LoadError) if the
/// archive or a slide part cannot be read.
pub fn read_slide_texts(path: &Path) -> Result<Vec<(usize, String)>> {
    let file = File::open(path).map_err(|e| load_error(path, format!("failed to open: {e}")))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| load_error(path, format!("not a valid archive: {e}")))?;

    let mut numbers: Vec<usize> = archive.file_names().filter_map(slide_number).collect();
    numbers.sort_unstable();

    let mut slides = Vec::new();
    for number in numbers {
        let entry = format!("ppt/slides/slide{number}.xml");
        let mut xml = String::new();
        archive
            .by_name(&entry)
            .map_err(|e| load_error(path, format!("missing entry '{entry}': {e}")))?
            .read_to_string(&mut xml)
            .map_err(|e| load_error(path, format!("failed to read entry '{entry}': {e}")))?;

        let paragraphs = ooxml::collect_paragraph_text(&xml, path, "a:t", "a:p")?;
        let text = paragraphs
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        slides.push((number, text));
    }
    Ok(slides)
}

fn slide_number(entry_name: &str) -> Option<usize> {
    entry_name.strip_prefix("ppt/slides/slide")?.strip_suffix(".xml")?.parse().ok()
}
