//! Quiz question generation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::InferenceBackend;
use crate::error::InferenceError;

/// Number of questions requested per generated quiz.
pub const QUESTION_COUNT: usize = 3;

/// One multiple-choice question as produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text.
    pub question: String,
    /// Answer options shown to players.
    pub options: Vec<String>,
    /// The correct option.
    pub answer: String,
}

/// Builds the prompt asking for a multiple-choice quiz on `topic`.
#[must_use]
pub fn quiz_prompt(topic: &str) -> String {
    format!(
        "Generate {QUESTION_COUNT} multiple-choice quiz questions on the topic '{topic}'. \
         Each question should have 1 correct answer and 3 incorrect ones. \
         Format the output as a JSON array like this: \
         [{{\"question\": \"...\", \"options\": [\"...\"], \"answer\": \"...\"}}, ...]"
    )
}

/// Slices the JSON array embedded in free-form model output: everything from
/// the first `[` to the last `]`, inclusive.
///
/// # Errors
///
/// Returns `InferenceError::MissingJsonArray` if there is no such span.
pub fn extract_json_array(text: &str) -> Result<&str, InferenceError> {
    let start = text.find('[').ok_or(InferenceError::MissingJsonArray)?;
    let end = text.rfind(']').ok_or(InferenceError::MissingJsonArray)?;
    if end < start {
        return Err(InferenceError::MissingJsonArray);
    }
    Ok(&text[start..=end])
}

/// Asks the backend for a quiz on `topic` and parses the questions out of its
/// reply.
///
/// # Errors
///
/// Returns the backend's error, `MissingJsonArray` if the reply has no array,
/// or `MalformedResponse` if the array is not a list of questions.
pub async fn generate_quiz(
    backend: &dyn InferenceBackend,
    topic: &str,
) -> Result<Vec<QuizQuestion>, InferenceError> {
    let content = backend.complete(&quiz_prompt(topic)).await?;
    let json = extract_json_array(&content)?;
    let questions: Vec<QuizQuestion> = serde_json::from_str(json)
        .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;
    debug!(topic, count = questions.len(), "quiz generated");
    Ok(questions)
}
