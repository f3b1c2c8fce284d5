//! CLI module
//!
//! Command-line interface for running inference.
//!
//! # Commands
//!
//! - `infer` - Infer schemas from a file or stdin
//! - `kinds` - List scalar wire kinds and their inferred types

mod commands;
mod runner;

pub use commands::{Cli, Commands, InputMode, OptionArgs, OutputFormat};
pub use runner::Runner;
