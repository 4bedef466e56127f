//! Cardkit Demo CLI
//!
//! Command implementations, exposed as a library so they can be tested
//! without spawning the binary.

pub mod commands;
pub mod ui;
