//! Route modules.

pub mod health;
pub mod quiz;
pub mod session;
