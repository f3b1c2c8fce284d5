// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # docshape
//!
//! Infers named, nested record schemas from a single JSON or extended JSON
//! document, the kind of shape a code generator turns into struct
//! definitions.
//!
//! ## Features
//!
//! - **Extended JSON**: `$oid`, `$date`, `$numberLong` and the other type-tag
//!   documents are read as their scalar types
//! - **Integer Narrowing**: Integers become int32/int64 by magnitude, or
//!   double when narrowing is off
//! - **Array Unification**: Homogeneous arrays get a precise element type,
//!   anything else falls back to dynamic
//! - **Nested Schemas**: Every nested document gets its own named schema
//!
//! ## Quick Start
//!
//! ```rust
//! use docshape::{infer_from_str, InferenceOptions, ReaderMode};
//!
//! let input = r#"{"name": "Ann", "age": 30, "addr": {"city": "NYC"}}"#;
//! let result = infer_from_str(input, ReaderMode::Extended, &InferenceOptions::default())?;
//!
//! assert_eq!(result.root().name, "Example");
//! assert_eq!(result.schemas()[1].name, "Addr");
//! # Ok::<(), docshape::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        infer(reader, options) → InferenceResult          │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴────────────┬────────────────┐
//! │    Reader    │         Builder          │    Unifier     │
//! ├──────────────┼──────────────────────────┼────────────────┤
//! │ ValueReader  │ fields → FieldSpec       │ element types  │
//! │ ExtJsonReader│ nested docs → SchemaNode │ depth limit    │
//! │ wire kinds   │ classify scalars         │ dynamic        │
//! └──────────────┴──────────────────────────┴────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Inference options and loading
pub mod config;

/// Document readers
pub mod reader;

/// Schema inference
pub mod schema;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, ResultExt};

pub use config::{load_options, load_options_from_str, InferenceOptions};
pub use reader::{ExtJsonReader, ReaderMode, ValueReader, WireKind};
pub use schema::{
    infer, infer_from_str, Annotation, FieldSpec, InferenceResult, ScalarType, SchemaBuilder,
    SchemaNode, TypeDescriptor,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
