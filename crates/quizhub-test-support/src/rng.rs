//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use quizhub_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min` from `next_u32_range`. Every join
/// code it produces is `AAAAAA`.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// An RNG that returns values from a predetermined sequence. Panics if the
/// sequence is exhausted. Used in tests that need specific join codes.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }
}

/// An RNG that counts upwards, wrapping within the requested range. Never
/// exhausts, and consecutive join codes differ.
#[derive(Debug, Default)]
pub struct StepRng {
    counter: u32,
}

impl StepRng {
    /// Create a new `StepRng` starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeterministicRng for StepRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let span = max.saturating_sub(min).saturating_add(1);
        let val = min + self.counter % span;
        self.counter = self.counter.wrapping_add(1);
        val
    }
}
