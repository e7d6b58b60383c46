//! Domain layer: aggregates, commands, join codes, and answer tallies.

pub mod aggregates;
pub mod code;
pub mod commands;
pub mod tally;
