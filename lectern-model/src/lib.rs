//! # lectern-model
//!
//! Language model clients for the Lectern course assistant.
//!
//! ## Overview
//!
//! This crate provides single-shot text generation behind one trait,
//! [`LanguageModel`]. Currently supports:
//!
//! - [`OllamaClient`] - locally hosted models via an Ollama server
//! - [`OpenAIChatClient`] - OpenAI chat models (GPT-4o, GPT-4o-mini, etc.)
//! - [`MockLlm`] - canned replies and request recording for tests
//!
//! ## Quick Start
//!
//! ### Ollama
//!
//! ```rust,ignore
//! use lectern_model::{GenerationRequest, LanguageModel, OllamaClient};
//!
//! let model = OllamaClient::new()?.with_model("llama3");
//! let text = model.generate(GenerationRequest::new("Summarize chapter one")).await?;
//! ```
//!
//! ### OpenAI
//!
//! ```rust,ignore
//! use lectern_model::openai::OpenAIChatClient;
//! use lectern_model::{GenerationRequest, LanguageModel};
//!
//! let model = OpenAIChatClient::from_env()?.with_model("gpt-4o-mini");
//! let text = model.generate(GenerationRequest::new("Summarize chapter one")).await?;
//! ```
//!
//! ## Features
//!
//! - `ollama` (default) - the Ollama client
//! - `openai` - the OpenAI client
//!
//! Generation is deliberately single-shot: callers compose a full prompt,
//! the backend returns a full response. There is no streaming surface.

pub mod error;
pub mod mock;
#[cfg(feature = "ollama")]
pub mod ollama;
#[cfg(feature = "openai")]
pub mod openai;
pub mod provider;

pub use error::{ModelError, Result};
pub use mock::MockLlm;
#[cfg(feature = "ollama")]
pub use ollama::OllamaClient;
#[cfg(feature = "openai")]
pub use openai::OpenAIChatClient;
pub use provider::{GenerationOptions, GenerationRequest, LanguageModel};
