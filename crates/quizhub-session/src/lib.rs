//! quizhub — Quiz Session bounded context.
//!
//! Responsible for session creation and join codes, player answer
//! accumulation and completion, session status, and per-player results.

pub mod application;
pub mod domain;
