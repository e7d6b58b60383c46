//! Ollama `/api/generate` backend.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::{InferenceBackend, TextStream};
use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::stream::relay_chunks;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// One object of a `/api/generate` reply. Non-streaming replies are a single
/// object; streaming replies are one object per line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateChunk {
    /// Generated text.
    #[serde(default)]
    pub response: String,
    /// Set on the last object of a reply.
    #[serde(default)]
    pub done: bool,
    /// Error message reported by the service instead of text.
    #[serde(default)]
    pub error: Option<String>,
}

/// Backend that talks to an Ollama server over HTTP.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: Client,
    config: InferenceConfig,
}

impl OllamaBackend {
    /// Creates a backend for the given settings.
    #[must_use]
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn request(&self, prompt: &str, stream: bool) -> reqwest::RequestBuilder {
        self.client
            .post(self.config.generate_url())
            .json(&GenerateRequest {
                model: &self.config.model,
                prompt,
                stream,
            })
    }

    fn classify(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout(self.config.timeout)
        } else {
            InferenceError::Http(err)
        }
    }
}

#[async_trait]
impl InferenceBackend for OllamaBackend {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        debug!(model = %self.config.model, "requesting completion");
        let response = self
            .request(prompt, false)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "inference service rejected request");
            return Err(InferenceError::HttpStatus(response.status()));
        }

        let body: GenerateChunk = response.json().await.map_err(|e| self.classify(e))?;
        match body.error {
            Some(message) => Err(InferenceError::Upstream(message)),
            None => Ok(body.response),
        }
    }

    async fn stream(&self, prompt: &str) -> Result<TextStream, InferenceError> {
        debug!(model = %self.config.model, "requesting streamed completion");
        let timeout = self.config.timeout;
        let response = tokio::time::timeout(timeout, self.request(prompt, true).send())
            .await
            .map_err(|_| InferenceError::Timeout(timeout))?
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "inference service rejected request");
            return Err(InferenceError::HttpStatus(response.status()));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(InferenceError::from));
        Ok(relay_chunks(body, timeout))
    }
}
