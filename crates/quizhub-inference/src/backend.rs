//! Inference backend abstraction.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::error::InferenceError;

/// Incremental model output.
pub type TextStream = BoxStream<'static, Result<String, InferenceError>>;

/// A service that turns prompts into text.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Generate the full reply to `prompt` in one piece.
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError>;

    /// Generate the reply to `prompt` as a stream of text chunks.
    async fn stream(&self, prompt: &str) -> Result<TextStream, InferenceError>;
}
