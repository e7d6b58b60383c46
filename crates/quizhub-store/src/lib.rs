//! Session store implementations for quizhub.
//!
//! [`memory::InMemorySessionRepository`] keeps everything in process memory;
//! [`pg::PgSessionRepository`] persists to PostgreSQL.

pub mod memory;
pub mod pg;
