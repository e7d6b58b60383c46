//! quizhub Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the session
//! context, the stores, and the HTTP layer depend on. It contains no
//! infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod repository;
pub mod rng;
