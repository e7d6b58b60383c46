//! Test inference backend — canned replies instead of a model.

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use quizhub_inference::{InferenceBackend, InferenceError, TextStream};

/// An inference backend with scripted output.
///
/// `complete` returns the configured reply; `stream` yields the configured
/// chunks in order. `Err` entries become `InferenceError::Upstream`.
#[derive(Debug, Clone)]
pub struct StubInference {
    reply: Result<String, String>,
    chunks: Vec<Result<String, String>>,
    stream_refused: Option<String>,
}

impl StubInference {
    /// A backend whose completions return `reply` and whose stream yields it
    /// as a single chunk.
    #[must_use]
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_owned()),
            chunks: vec![Ok(reply.to_owned())],
            stream_refused: None,
        }
    }

    /// A backend whose every call fails with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_owned()),
            chunks: Vec::new(),
            stream_refused: Some(message.to_owned()),
        }
    }

    /// A backend that streams `chunks`.
    #[must_use]
    pub fn streaming(chunks: Vec<Result<String, String>>) -> Self {
        let reply = chunks.iter().filter_map(|c| c.as_ref().ok()).cloned().collect();
        Self {
            reply: Ok(reply),
            chunks,
            stream_refused: None,
        }
    }
}

#[async_trait]
impl InferenceBackend for StubInference {
    async fn complete(&self, _prompt: &str) -> Result<String, InferenceError> {
        self.reply.clone().map_err(InferenceError::Upstream)
    }

    async fn stream(&self, _prompt: &str) -> Result<TextStream, InferenceError> {
        if let Some(message) = &self.stream_refused {
            return Err(InferenceError::Upstream(message.clone()));
        }
        let chunks: Vec<Result<String, InferenceError>> = self
            .chunks
            .iter()
            .cloned()
            .map(|c| c.map_err(InferenceError::Upstream))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }
}
