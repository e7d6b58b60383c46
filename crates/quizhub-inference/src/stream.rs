//! Streaming helpers: NDJSON decoding, chunk relay, and error markers.

use std::collections::VecDeque;
use std::time::Duration;

use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt};

use crate::backend::{InferenceBackend, TextStream};
use crate::error::InferenceError;
use crate::ollama::GenerateChunk;

/// Prefix written into a relayed stream when generation fails part-way.
pub const ERROR_MARKER: &str = "[ERROR]: ";

/// Splits a byte stream into newline-delimited JSON objects.
///
/// Bytes are buffered until a newline arrives, so objects may be split
/// across network reads at any point.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds bytes and returns every complete line decoded so far.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Result<GenerateChunk, InferenceError>> {
        self.buffer.extend_from_slice(bytes);
        let mut decoded = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(chunk) = parse_line(&line) {
                decoded.push(chunk);
            }
        }
        decoded
    }

    /// Decodes whatever is left once the input has ended.
    pub fn finish(&mut self) -> Option<Result<GenerateChunk, InferenceError>> {
        let rest = std::mem::take(&mut self.buffer);
        parse_line(&rest)
    }
}

fn parse_line(line: &[u8]) -> Option<Result<GenerateChunk, InferenceError>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    Some(
        serde_json::from_slice(line)
            .map_err(|e| InferenceError::MalformedResponse(e.to_string())),
    )
}

struct Relay {
    body: BoxStream<'static, Result<Vec<u8>, InferenceError>>,
    decoder: NdjsonDecoder,
    pending: VecDeque<Result<GenerateChunk, InferenceError>>,
    idle: Duration,
    body_done: bool,
    finished: bool,
}

/// Turns a raw NDJSON body into a stream of generated text.
///
/// Empty chunks are skipped. The stream ends after the chunk marked `done`,
/// when the body ends, or after the first error. Waiting longer than `idle`
/// for the next piece of the body yields `InferenceError::Timeout`.
pub fn relay_chunks<S>(body: S, idle: Duration) -> TextStream
where
    S: Stream<Item = Result<Vec<u8>, InferenceError>> + Send + 'static,
{
    let relay = Relay {
        body: body.boxed(),
        decoder: NdjsonDecoder::new(),
        pending: VecDeque::new(),
        idle,
        body_done: false,
        finished: false,
    };

    stream::unfold(relay, |mut relay| async move {
        loop {
            if relay.finished {
                return None;
            }

            if let Some(item) = relay.pending.pop_front() {
                match item {
                    Ok(chunk) => {
                        if let Some(message) = chunk.error {
                            relay.finished = true;
                            return Some((Err(InferenceError::Upstream(message)), relay));
                        }
                        if chunk.done {
                            relay.finished = true;
                        }
                        if chunk.response.is_empty() {
                            continue;
                        }
                        return Some((Ok(chunk.response), relay));
                    }
                    Err(err) => {
                        relay.finished = true;
                        return Some((Err(err), relay));
                    }
                }
            }

            if relay.body_done {
                return None;
            }

            match tokio::time::timeout(relay.idle, relay.body.next()).await {
                Ok(Some(Ok(bytes))) => {
                    let decoded = relay.decoder.push(&bytes);
                    relay.pending.extend(decoded);
                }
                Ok(Some(Err(err))) => {
                    relay.finished = true;
                    return Some((Err(err), relay));
                }
                Ok(None) => {
                    relay.body_done = true;
                    if let Some(rest) = relay.decoder.finish() {
                        relay.pending.push_back(rest);
                    }
                }
                Err(_) => {
                    relay.finished = true;
                    let idle = relay.idle;
                    return Some((Err(InferenceError::Timeout(idle)), relay));
                }
            }
        }
    })
    .boxed()
}

/// Formats an error the way it appears inside a relayed stream.
#[must_use]
pub fn error_marker(err: &InferenceError) -> String {
    format!("{ERROR_MARKER}{err}")
}

/// Relays text chunks, replacing the first error with an inline
/// `[ERROR]: <message>` chunk and ending the stream there.
pub fn with_error_marker(stream: TextStream) -> BoxStream<'static, String> {
    stream::unfold(Some(stream), |state| async move {
        let mut inner = state?;
        match inner.next().await? {
            Ok(text) => Some((text, Some(inner))),
            Err(err) => {
                tracing::warn!(error = %err, "inference stream failed");
                Some((error_marker(&err), None))
            }
        }
    })
    .boxed()
}

/// Streams the backend's answer to `prompt`. Failures, including a failure to
/// start the stream, are reported inline rather than as an error.
pub async fn relay_answer(backend: &dyn InferenceBackend, prompt: &str) -> BoxStream<'static, String> {
    match backend.stream(prompt).await {
        Ok(chunks) => with_error_marker(chunks),
        Err(err) => {
            tracing::warn!(error = %err, "inference stream could not start");
            stream::once(async move { error_marker(&err) }).boxed()
        }
    }
}
