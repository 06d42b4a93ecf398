//! Command implementations for the monoikos CLI.

pub mod commands;
pub mod output;
