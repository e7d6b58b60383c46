//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use quizhub_inference::InferenceConfig;

use crate::error::AppError;

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// PostgreSQL URL. Sessions are kept in memory when unset.
    pub database_url: Option<String>,
    /// Inference service settings.
    pub inference: InferenceConfig,
    /// OTLP collector endpoint. Span export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = non_empty("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

        let defaults = InferenceConfig::default();
        let timeout_secs: u64 = match non_empty("INFERENCE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "INFERENCE_TIMEOUT_SECS must be a positive integer, got {raw:?}"
                    ))
                })?,
            None => defaults.timeout.as_secs(),
        };
        let inference = InferenceConfig {
            base_url: non_empty("OLLAMA_URL").unwrap_or(defaults.base_url),
            model: non_empty("OLLAMA_MODEL").unwrap_or(defaults.model),
            timeout: Duration::from_secs(timeout_secs),
        };

        Ok(Self {
            host,
            port,
            database_url: non_empty("DATABASE_URL"),
            inference,
            otlp_endpoint: non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
