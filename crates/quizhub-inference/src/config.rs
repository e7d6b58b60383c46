//! Inference service connection settings.

use std::time::Duration;

/// Where the inference service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceConfig {
    /// Base URL of the service, without the `/api/generate` suffix.
    pub base_url: String,
    /// Model name passed with every request.
    pub model: String,
    /// Upper bound for a complete reply, and for the gap between two
    /// streamed chunks.
    pub timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3".into(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl InferenceConfig {
    /// Full URL of the generate endpoint.
    #[must_use]
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}
