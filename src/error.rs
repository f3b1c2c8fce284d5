//! Error types for docshape
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::reader::WireKind;
use thiserror::Error;

/// The main error type for docshape
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Inference Errors
    // ============================================================================
    #[error("Expecting a document type, received {found}")]
    NotADocument { found: WireKind },

    #[error("Expecting an array type, received {found}")]
    NotAnArray { found: WireKind },

    #[error("Unknown type: {kind}")]
    UnknownType { kind: WireKind },

    #[error("Reader fault: {message}")]
    Reader { message: String },

    /// An inference error annotated with the field path it occurred under
    #[error("field `{path}`: {source}")]
    Field { path: String, source: Box<Error> },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a reader fault
    pub fn reader(message: impl Into<String>) -> Self {
        Self::Reader {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap this error with one more path segment.
    ///
    /// Segments are either a field key (`zip`) or an array index (`[2]`).
    /// Wrapping an already wrapped error extends its path instead of
    /// nesting, so the outermost error reads `addresses[2].zip`.
    #[must_use]
    pub fn within(self, segment: &str) -> Self {
        match self {
            Error::Field { path, source } => {
                let path = if path.starts_with('[') {
                    format!("{segment}{path}")
                } else {
                    format!("{segment}.{path}")
                };
                Error::Field { path, source }
            }
            other => Error::Field {
                path: segment.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The field path this error was raised under, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::Field { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The innermost error, with any path context stripped
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias for docshape
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add a field path segment to an error
    fn in_field(self, segment: &str) -> Result<T>;

    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn in_field(self, segment: &str) -> Result<T> {
        self.map_err(|e| e.into().within(segment))
    }

    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}
