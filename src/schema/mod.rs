//! Schema inference module
//!
//! Infers named, nested record schemas from a document walked through a
//! [`ValueReader`](crate::reader::ValueReader).
//!
//! # Features
//!
//! - **Value Classification**: Maps scalar wire kinds to semantic types
//! - **Array Unification**: Finds the common element type of an array, or
//!   falls back to dynamic
//! - **Nested Schemas**: Every nested document gets its own named schema
//! - **Depth Limit**: Arrays of arrays are typed only to a bounded depth

mod builder;
mod classify;
mod types;
mod unify;

pub use builder::{build_document, infer, infer_from_str, title_case, SchemaBuilder};
pub use classify::{classify, Classification};
pub use types::{
    Annotation, Depth, FieldSpec, InferenceResult, ScalarType, SchemaNode, TypeDescriptor,
};
pub use unify::{unify_array, Unified};
