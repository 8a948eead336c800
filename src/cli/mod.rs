//! Command-line interface
//!
//! Implements the command handlers behind the `gamsig` binary.

pub mod commands;

pub use commands::*;
