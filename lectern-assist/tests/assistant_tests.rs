//! End-to-end tests for the assistant facade: gated answering over a real
//! course directory, the disabled state, and builder validation.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use lectern_assist::{
    AssistError, CourseAssistant, GROUNDING_INSTRUCTION, QuestionGate, REFUSAL_MESSAGE, Reply,
};
use lectern_model::MockLlm;
use lectern_rag::{MockEmbeddingProvider, RetrievalConfig, SnapshotIndex};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const BLOCKED: &str = "what is the answer to question 3 on the midterm";

/// Write a minimal `.pptx` with one slide part per `(number, paragraphs)` pair.
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

/// A course directory holding one two-slide biology deck.
fn course_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_pptx(
        &dir.path().join("deck.pptx"),
        &[
            (1, &["Photosynthesis converts light to energy."][..]),
            (2, &["Mitochondria produce ATP."][..]),
        ],
    );
    dir
}

fn short_chunk_config() -> RetrievalConfig {
    // The fixture slides are shorter than the default 50-char minimum.
    RetrievalConfig::builder().min_chunk_chars(20).top_k(1).build().unwrap()
}

async fn assistant(dir: &TempDir, gate: QuestionGate, model: Arc<MockLlm>) -> CourseAssistant {
    CourseAssistant::builder()
        .course_dir(dir.path())
        .config(short_chunk_config())
        .gate(gate)
        .model(model)
        .embedder(Arc::new(MockEmbeddingProvider::default()))
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn answers_course_questions_from_the_deck() {
    let dir = course_dir();
    let model = Arc::new(MockLlm::new("Photosynthesis converts light into usable energy."));
    let assistant = assistant(&dir, QuestionGate::new(), model.clone()).await;

    assert!(assistant.is_ready());
    assert_eq!(assistant.chunk_count().await, 2);

    let reply = assistant.ask("What converts light to energy?").await;
    let answer = match reply {
        Some(Reply::Answer(answer)) => answer,
        other => panic!("expected an answer, got {other:?}"),
    };

    assert!(!answer.failed);
    assert_eq!(answer.text, "Photosynthesis converts light into usable energy.");
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].chunk.document_id, "deck_s1");

    let requests = model.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].system.as_deref(), Some(GROUNDING_INSTRUCTION));
    assert!(requests[0].prompt.contains("Photosynthesis converts light to energy."));
    assert!(requests[0].prompt.contains("Question: What converts light to energy?"));
}

#[tokio::test]
async fn blocklisted_questions_are_refused_without_model_calls() {
    let dir = course_dir();
    let model = Arc::new(MockLlm::new("unused"));
    let gate = QuestionGate::new().block(BLOCKED);
    let assistant = assistant(&dir, gate, model.clone()).await;

    let reply = assistant.ask("What's the answer to Q3 on the midterm?").await;
    match reply {
        Some(Reply::Refused(message)) => assert_eq!(message, REFUSAL_MESSAGE),
        other => panic!("expected a refusal, got {other:?}"),
    }
    assert_eq!(model.request_count().await, 0);
}

#[tokio::test]
async fn overridden_questions_get_the_canned_answer() {
    let dir = course_dir();
    let model = Arc::new(MockLlm::new("unused"));
    let gate =
        QuestionGate::new().with_override("when are office hours", "Tuesdays at 3pm in room 204.");
    let assistant = assistant(&dir, gate, model.clone()).await;

    let reply = assistant.ask("When are office hours?").await;
    match reply {
        Some(Reply::Canned(answer)) => assert_eq!(answer, "Tuesdays at 3pm in room 204."),
        other => panic!("expected a canned answer, got {other:?}"),
    }
    assert_eq!(model.request_count().await, 0);
}

#[tokio::test]
async fn empty_course_directory_disables_answering_only() {
    let empty = TempDir::new().unwrap();
    let model = Arc::new(MockLlm::new("Generated text."));
    let gate = QuestionGate::new().block(BLOCKED);
    let assistant = assistant(&empty, gate, model.clone()).await;

    assert!(!assistant.is_ready());
    assert_eq!(assistant.chunk_count().await, 0);
    assert!(assistant.slide_decks().is_empty());

    // Disabled answering is a no-op for every question, blocked ones included.
    assert!(assistant.ask("What converts light to energy?").await.is_none());
    assert!(assistant.ask("What's the answer to Q3 on the midterm?").await.is_none());
    assert_eq!(model.request_count().await, 0);

    // Review and critique only need the model, not the index.
    let deck_dir = course_dir();
    let sheet = assistant.review_questions(&deck_dir.path().join("deck.pptx"), 5).await;
    assert!(!sheet.failed);

    let critique = assistant.critique_argument("Uniforms limit self-expression.").await;
    assert!(!critique.failed);
}

#[tokio::test]
async fn decks_and_skipped_files_are_reported() {
    let dir = course_dir();
    std::fs::write(dir.path().join("notes.docx"), b"not an archive").unwrap();

    let model = Arc::new(MockLlm::new("unused"));
    let assistant = assistant(&dir, QuestionGate::new(), model).await;

    let decks = assistant.slide_decks();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0], dir.path().join("deck.pptx"));

    let skipped = assistant.skipped_files();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].path.ends_with("notes.docx"));

    assert_eq!(assistant.course_dir(), dir.path());
}

async fn snapshot_assistant(course: &Path, snapshots: &Path) -> CourseAssistant {
    CourseAssistant::builder()
        .course_dir(course)
        .snapshot_dir(snapshots)
        .config(short_chunk_config())
        .model(Arc::new(MockLlm::new("Photosynthesis.")))
        .embedder(Arc::new(MockEmbeddingProvider::default()))
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn snapshot_directory_is_reused_across_builds() {
    let dir = course_dir();
    let snapshots = TempDir::new().unwrap();

    let first = snapshot_assistant(dir.path(), snapshots.path()).await;
    assert_eq!(first.chunk_count().await, 2);
    assert!(SnapshotIndex::exists(snapshots.path()));
    drop(first);

    let second = snapshot_assistant(dir.path(), snapshots.path()).await;
    assert_eq!(second.chunk_count().await, 2);
    match second.ask("What converts light to energy?").await {
        Some(Reply::Answer(answer)) => {
            assert_eq!(answer.sources[0].chunk.document_id, "deck_s1");
        }
        other => panic!("expected an answer, got {other:?}"),
    }
}

#[tokio::test]
async fn builder_requires_course_dir_model_and_embedder() {
    match CourseAssistant::builder().build().await {
        Err(AssistError::Config(message)) => {
            assert!(message.contains("course directory"), "unexpected: {message}");
        }
        Err(other) => panic!("expected Config, got {other:?}"),
        Ok(_) => panic!("expected Config, got an assistant"),
    }

    let dir = course_dir();
    match CourseAssistant::builder().course_dir(dir.path()).build().await {
        Err(AssistError::Config(message)) => {
            assert!(message.contains("model"), "unexpected: {message}");
        }
        Err(other) => panic!("expected Config, got {other:?}"),
        Ok(_) => panic!("expected Config, got an assistant"),
    }

    match CourseAssistant::builder()
        .course_dir(dir.path())
        .model(Arc::new(MockLlm::new("unused")))
        .build()
        .await
    {
        Err(AssistError::Config(message)) => {
            assert!(message.contains("embedder"), "unexpected: {message}");
        }
        Err(other) => panic!("expected Config, got {other:?}"),
        Ok(_) => panic!("expected Config, got an assistant"),
    }
}

#[tokio::test]
async fn missing_course_directory_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let result = CourseAssistant::builder()
        .course_dir(&missing)
        .model(Arc::new(MockLlm::new("unused")))
        .embedder(Arc::new(MockEmbeddingProvider::default()))
        .build()
        .await;

    match result {
        Err(AssistError::Rag(e)) => {
            assert!(e.to_string().contains("nope"), "unexpected: {e}");
        }
        Err(other) => panic!("expected Rag, got {other:?}"),
        Ok(_) => panic!("expected Rag, got an assistant"),
    }
}
