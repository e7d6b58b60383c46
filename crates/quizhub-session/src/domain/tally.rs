//! Order-preserving answer frequency tally.

use std::collections::HashMap;

/// Result reported for a player who has not answered anything.
pub const UNKNOWN_ANSWER: &str = "unknown";

/// Counts occurrences of each distinct answer, remembering the order in
/// which answers were first seen.
#[derive(Debug, Default, Clone)]
pub struct AnswerTally<'a> {
    /// `(answer, count)` in first-occurrence order.
    entries: Vec<(&'a str, usize)>,
    /// Position of each answer in `entries`.
    index: HashMap<&'a str, usize>,
}

impl<'a> AnswerTally<'a> {
    /// Builds a tally over an answer sequence.
    #[must_use]
    pub fn from_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = &'a S>,
        S: AsRef<str> + 'a + ?Sized,
    {
        let mut tally = Self::default();
        for answer in answers {
            tally.add(answer.as_ref());
        }
        tally
    }

    /// Counts one more occurrence of `answer`.
    pub fn add(&mut self, answer: &'a str) {
        if let Some(&position) = self.index.get(answer) {
            self.entries[position].1 += 1;
        } else {
            self.index.insert(answer, self.entries.len());
            self.entries.push((answer, 1));
        }
    }

    /// The most frequent answer. Among answers tied for the highest count the
    /// one seen first wins. `None` when nothing was counted.
    #[must_use]
    pub fn dominant(&self) -> Option<&'a str> {
        let mut best: Option<(&'a str, usize)> = None;
        for &(answer, count) in &self.entries {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((answer, count)),
            }
        }
        best.map(|(answer, _)| answer)
    }
}

/// Dominant answer of a sequence, or [`UNKNOWN_ANSWER`] if it is empty.
#[must_use]
pub fn dominant_answer(answers: &[String]) -> String {
    AnswerTally::from_answers(answers)
        .dominant()
        .unwrap_or(UNKNOWN_ANSWER)
        .to_owned()
}
