//! Tests for document loading: format dispatch, OOXML text extraction, and
//! corrupt-file isolation.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use lectern_rag::error::RagError;
use lectern_rag::loader::{DocumentLoader, read_slide_texts};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Write a minimal `.docx`: one `word/document.xml` part with the given paragraphs.
fn write_docx(path: &Path, paragraphs: &[&str]) {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>",
    );
    for paragraph in paragraphs {
        body.push_str(&format!("<w:p><w:r><w:t>{paragraph}</w:t></w:r></w:p>"));
    }
    body.push_str("</w:body></w:document>");

    let mut archive = ZipWriter::new(File::create(path).unwrap());
    archive.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
    archive.write_all(body.as_bytes()).unwrap();
    archive.finish().unwrap();
}

/// Write a minimal `.pptx` with one slide part per `(number, paragraphs)` pair,
/// in the given (possibly scrambled) archive order.
fn write_pptx(path: &Path, slides: &[(usize, &[&str])]) {
    let mut archive = ZipWriter::new(File::create(path).unwrap());
    for (number, paragraphs) in slides {
        let mut part = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\"\
             xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:cSld>",
        );
        for paragraph in *paragraphs {
            part.push_str(&format!("<a:p><a:r><a:t>{paragraph}</a:t></a:r></a:p>"));
        }
        part.push_str("</p:cSld></p:sld>");

        archive
            .start_file(format!("ppt/slides/slide{number}.xml"), SimpleFileOptions::default())
            .unwrap();
        archive.write_all(part.as_bytes()).unwrap();
    }
    archive.finish().unwrap();
}

#[test]
fn docx_paragraphs_are_joined_with_blank_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("syllabus.docx");
    write_docx(&path, &["Welcome to the course.", "The midterm is in week six."]);

    let documents = DocumentLoader::new().load_file(&path).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, "syllabus");
    assert_eq!(documents[0].text, "Welcome to the course.\n\nThe midterm is in week six.");
    assert_eq!(documents[0].metadata.get("source_format"), Some(&"docx".to_string()));
    assert_eq!(documents[0].metadata.get("source_file"), Some(&"syllabus.docx".to_string()));
}

#[test]
fn docx_concatenates_runs_and_unescapes_entities() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.docx");

    // Two runs in one paragraph, with an XML entity in the second.
    let body = "<?xml version=\"1.0\"?><w:document><w:body>\
                <w:p><w:r><w:t>Cells </w:t></w:r><w:r><w:t>&amp; membranes</w:t></w:r></w:p>\
                </w:body></w:document>";
    let mut archive = ZipWriter::new(File::create(&path).unwrap());
    archive.start_file("word/document.xml", SimpleFileOptions::default()).unwrap();
    archive.write_all(body.as_bytes()).unwrap();
    archive.finish().unwrap();

    let documents = DocumentLoader::new().load_file(&path).unwrap();
    assert_eq!(documents[0].text, "Cells & membranes");
}

#[test]
fn docx_with_no_text_yields_no_documents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.docx");
    write_docx(&path, &[]);

    let documents = DocumentLoader::new().load_file(&path).unwrap();
    assert!(documents.is_empty());
}

#[test]
fn pptx_yields_one_document_per_slide_in_numeric_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deck.pptx");
    // Archive order is scrambled; slide 10 must still come after slide 2.
    write_pptx(
        &path,
        &[
            (10, &["Final review session"][..]),
            (1, &["Introduction", "What this course covers"][..]),
            (2, &["Cell structure"][..]),
        ],
    );

    let documents = DocumentLoader::new().load_file(&path).unwrap();
    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["deck_s1", "deck_s2", "deck_s10"]);

    // Paragraphs within a slide are joined with single newlines.
    assert_eq!(documents[0].text, "Introduction\nWhat this course covers");
    assert_eq!(documents[0].metadata.get("slide"), Some(&"1".to_string()));
    assert_eq!(documents[2].metadata.get("slide"), Some(&"10".to_string()));
}

#[test]
fn pptx_skips_slides_with_no_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deck.pptx");
    write_pptx(&path, &[(1, &["Title slide"][..]), (2, &[][..]), (3, &["Summary"][..])]);

    let documents = DocumentLoader::new().load_file(&path).unwrap();
    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["deck_s1", "deck_s3"]);
}

#[test]
fn read_slide_texts_keeps_empty_slides_and_numbering() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deck.pptx");
    write_pptx(&path, &[(2, &[][..]), (1, &["First"][..]), (3, &["Third"][..])]);

    let slides = read_slide_texts(&path).unwrap();
    assert_eq!(
        slides,
        vec![
            (1, "First".to_string()),
            (2, String::new()),
            (3, "Third".to_string()),
        ]
    );
}

#[test]
fn corrupt_file_does_not_abort_a_directory_load() {
    let dir = TempDir::new().unwrap();
    write_docx(&dir.path().join("a.docx"), &["Lecture notes for week one."]);
    write_pptx(&dir.path().join("b.pptx"), &[(1, &["Week two overview"][..])]);
    std::fs::write(dir.path().join("corrupt.pdf"), b"this is not a pdf").unwrap();

    let outcome = DocumentLoader::new().load_dir(dir.path()).unwrap();

    let ids: Vec<&str> = outcome.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b_s1"]);

    assert_eq!(outcome.skipped.len(), 1);
    assert!(outcome.skipped[0].path.ends_with("corrupt.pdf"));
    assert!(!outcome.skipped[0].reason.is_empty());
}

#[test]
fn unsupported_extensions_are_skipped_silently() {
    let dir = TempDir::new().unwrap();
    write_docx(&dir.path().join("a.docx"), &["Lecture notes for week one."]);
    std::fs::write(dir.path().join("notes.txt"), b"plain text sidecar").unwrap();

    let outcome = DocumentLoader::new().load_dir(dir.path()).unwrap();
    assert_eq!(outcome.documents.len(), 1);
    assert!(outcome.skipped.is_empty());
}

#[test]
fn directory_load_follows_file_name_order() {
    let dir = TempDir::new().unwrap();
    write_docx(&dir.path().join("b.docx"), &["Second file."]);
    write_docx(&dir.path().join("a.docx"), &["First file."]);

    let outcome = DocumentLoader::new().load_dir(dir.path()).unwrap();
    let ids: Vec<&str> = outcome.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn empty_directory_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let outcome = DocumentLoader::new().load_dir(dir.path()).unwrap();
    assert!(outcome.documents.is_empty());
    assert!(outcome.skipped.is_empty());
}

#[test]
fn missing_directory_is_a_load_error() {
    let result = DocumentLoader::new().load_dir(Path::new("/nonexistent/course-files"));
    assert!(matches!(result, Err(RagError::LoadError { .. })));
}

#[test]
fn load_file_rejects_unsupported_and_corrupt_files() {
    let dir = TempDir::new().unwrap();
    let loader = DocumentLoader::new();

    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, b"plain text").unwrap();
    match loader.load_file(&txt) {
        Err(RagError::LoadError { message, .. }) => {
            assert!(message.contains("unsupported extension"), "unexpected: {message}");
        }
        other => panic!("expected LoadError, got {other:?}"),
    }

    let no_ext = dir.path().join("README");
    std::fs::write(&no_ext, b"no extension").unwrap();
    assert!(matches!(loader.load_file(&no_ext), Err(RagError::LoadError { .. })));

    // A docx that is not a zip archive fails in the reader.
    let bad = dir.path().join("bad.docx");
    std::fs::write(&bad, b"garbage bytes").unwrap();
    assert!(matches!(loader.load_file(&bad), Err(RagError::LoadError { .. })));
}

#[test]
fn supported_extensions_cover_the_course_formats() {
    let loader = DocumentLoader::new();
    assert_eq!(loader.supported_extensions(), vec!["docx", "pdf", "pptx"]);
}
