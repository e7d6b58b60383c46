//! Client for the local inference service.
//!
//! Question generation and conversational answering are forwarded to an
//! Ollama-compatible `/api/generate` endpoint. The session engine never looks
//! at generated content.

pub mod backend;
pub mod config;
pub mod error;
pub mod ollama;
pub mod quiz;
pub mod stream;

pub use backend::{InferenceBackend, TextStream};
pub use config::InferenceConfig;
pub use error::InferenceError;
pub use ollama::OllamaBackend;
