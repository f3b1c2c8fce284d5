//! CLI commands and argument parsing

use crate::reader::ReaderMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Infer record schemas from JSON and extended JSON documents
#[derive(Parser, Debug)]
#[command(name = "docshape")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Inference options file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Infer schemas from a document
    Infer {
        /// Input document (reads stdin when omitted)
        input: Option<PathBuf>,

        /// How to interpret the input
        #[arg(short, long, default_value = "extended")]
        mode: InputMode,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// List scalar wire kinds and the type each infers to
    Kinds {
        #[command(flatten)]
        options: OptionArgs,
    },
}

/// Flags overriding values from the options file
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Name of the root schema
    #[arg(short, long)]
    pub name: Option<String>,

    /// Type integers as double instead of int32/int64
    #[arg(long)]
    pub no_minimize_integers: bool,

    /// Mark narrowed integers as truncatable
    #[arg(long)]
    pub truncate_integers: bool,

    /// Array-within-array levels typed before falling back to dynamic
    #[arg(long)]
    pub array_depth_limit: Option<usize>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Human-readable outline
    Pretty,
}

/// Input interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputMode {
    /// Extended JSON (`$oid`, `$date`, ... read as their scalar types)
    Extended,
    /// Plain JSON, numbers narrowed by value
    Simple,
}

impl From<InputMode> for ReaderMode {
    fn from(mode: InputMode) -> Self {
        match mode {
            InputMode::Extended => ReaderMode::Extended,
            InputMode::Simple => ReaderMode::Simple,
        }
    }
}
