//! # lectern-assist
//!
//! The instructor-facing course assistant: gated question answering over
//! course material, review-question generation from slide decks, and
//! debate-argument critique.
//!
//! ## Overview
//!
//! - [`CourseAssistant`] - the facade a course UI talks to
//! - [`QuestionGate`] - fuzzy blocklist and canned-answer overrides
//! - [`GroundedAnswerer`] - retrieval-grounded question answering
//! - [`ReviewQuestionGenerator`] - open-ended review questions from `.pptx` decks
//! - [`ArgumentCritic`] - coaching feedback on debate arguments
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lectern_assist::{CourseAssistant, QuestionGate, Reply};
//!
//! let gate = QuestionGate::new()
//!     .block("what is the answer to question 3 on the midterm")
//!     .with_override("when are office hours", "Tuesdays at 3pm in room 204.");
//!
//! let assistant = CourseAssistant::builder()
//!     .course_dir("./course")
//!     .snapshot_dir("./index")
//!     .gate(gate)
//!     .model(model)
//!     .embedder(embedder)
//!     .build()
//!     .await?;
//!
//! match assistant.ask("When are office hours?").await {
//!     Some(Reply::Canned(answer)) => println!("{answer}"),
//!     Some(Reply::Refused(message)) => println!("{message}"),
//!     Some(Reply::Answer(answer)) => println!("{}", answer.text),
//!     None => println!("no course material loaded"),
//! }
//! ```
//!
//! ## Failure policy
//!
//! Errors stop at construction time. Once an assistant is built, the
//! student-facing operations ([`ask`](CourseAssistant::ask),
//! [`review_questions`](CourseAssistant::review_questions),
//! [`critique_argument`](CourseAssistant::critique_argument)) never return
//! `Err`: retrieval and generation failures are absorbed into replies with
//! a marked failure text, so a UI always has something to display.

pub mod answerer;
pub mod assistant;
pub mod debate;
pub mod error;
pub mod gate;
pub mod review;

pub use answerer::{ANSWER_FAILURE_MESSAGE, Answer, GROUNDING_INSTRUCTION, GroundedAnswerer};
pub use assistant::{CourseAssistant, CourseAssistantBuilder, Reply};
pub use debate::{ArgumentCritic, CRITIQUE_FAILURE_MESSAGE, Critique, EMPTY_ARGUMENT_MESSAGE};
pub use error::{AssistError, Result};
pub use gate::{DEFAULT_MATCH_CUTOFF, GateDecision, QuestionGate, REFUSAL_MESSAGE};
pub use review::{
    DEFAULT_QUESTION_COUNT, EMPTY_DECK_MESSAGE, MAX_SLIDES, REVIEW_FAILURE_MESSAGE,
    ReviewQuestionGenerator, ReviewSheet,
};
