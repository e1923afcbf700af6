//! Shared parsing helpers for OOXML containers (DOCX, PPTX).
//!
//! Both formats are zip archives holding XML parts. Text lives in run
//! elements (`w:t` for Word, `a:t` for DrawingML) grouped into paragraph
//! elements (`w:p`, `a:p`); everything else is layout noise for our
//! purposes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use super::load_error;
use crate::error::Result;

/// Open a zip archive and read one named entry as UTF-8 text.
pub(crate) fn read_zip_entry(path: &Path, entry: &str) -> Result<String> {
    let file = File::open(path).map_err(|e| load_error(path, format!("failed to open: {e}")))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| load_error(path, format!("not a valid archive: {e}")))?;
    let mut part = archive
        .by_name(entry)
        .map_err(|e| load_error(path, format!("missing entry '{entry}': {e}")))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| load_error(path, format!("failed to read entry '{entry}': {e}")))?;
    Ok(xml)
}

/// Collect the text of every paragraph in an XML part.
///
/// Text content is gathered from `text_tag` runs; a closing
/// `paragraph_tag` finishes the current paragraph. Entity references are
/// unescaped. Returns one string per paragraph, in document order.
pub(crate) fn collect_paragraph_text(
    xml: &str,
    path: &Path,
    text_tag: &str,
    paragraph_tag: &str,
) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == text_tag.as_bytes() => {
                in_text_run = true;
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if name.as_ref() == text_tag.as_bytes() {
                    in_text_run = false;
                } else if name.as_ref() == paragraph_tag.as_bytes() {
                    paragraphs.push(std::mem::take(&mut current));
                }
            }
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| load_error(path, format!("invalid XML text: {e}")))?;
                current.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(load_error(path, format!("XML parse error: {e}"))),
        }
    }

    // Text outside any closed paragraph (malformed but salvageable).
    if !current.is_empty() {
        paragraphs.push(current);
    }
    Ok(paragraphs)
}
