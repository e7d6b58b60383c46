//! Session join codes.

use std::fmt;

use quizhub_core::error::DomainError;
use quizhub_core::rng::DeterministicRng;

/// Length of the codes handed out to new sessions.
pub const CODE_LENGTH: usize = 6;

/// Symbols a join code is drawn from: `A-Z` then `0-9`.
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A join code: characters from [`CODE_ALPHABET`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionCode(String);

impl SessionCode {
    /// Accepts `raw` only if it has the shape of a generated code:
    /// [`CODE_LENGTH`] characters from [`CODE_ALPHABET`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for any other string.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() == CODE_LENGTH && raw.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(DomainError::Validation(format!("malformed session code {raw:?}")))
        }
    }

    /// The code as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code, returning its text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates a join code of `length` characters, each drawn uniformly from
/// [`CODE_ALPHABET`].
///
/// Uniqueness is not guaranteed here; the session store rejects duplicates.
pub fn generate_code(rng: &mut dyn DeterministicRng, length: usize) -> SessionCode {
    #[allow(clippy::cast_possible_truncation)]
    let max_index = (CODE_ALPHABET.len() - 1) as u32;
    let code = (0..length)
        .map(|_| {
            let index = rng.next_u32_range(0, max_index) as usize;
            char::from(CODE_ALPHABET[index])
        })
        .collect();
    SessionCode(code)
}
