//! Shared test mocks and utilities for quizhub.

mod clock;
mod inference;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use inference::StubInference;
pub use repository::{FailingSessionRepository, YieldingSessionRepository};
pub use rng::{MockRng, SequenceRng, StepRng};
