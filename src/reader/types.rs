//! Reader types and traits
//!
//! Defines the wire kinds a reader reports and the forward-only cursor
//! contract the inference engine consumes.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of the value currently under a reader's cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireKind {
    Double,
    String,
    Document,
    Array,
    Binary,
    Undefined,
    ObjectId,
    Boolean,
    DateTime,
    Null,
    Regex,
    DbPointer,
    JavaScript,
    Symbol,
    CodeWithScope,
    Int32,
    Timestamp,
    Int64,
    Decimal128,
    MinKey,
    MaxKey,
    /// A type tag the reader reported but this crate does not recognise
    Unknown(u8),
}

/// Coarse grouping of wire kinds used by array unification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Scalar,
    Document,
    Array,
}

impl WireKind {
    /// Every recognised wire kind, in type-tag order
    pub const ALL: [WireKind; 21] = [
        WireKind::Double,
        WireKind::String,
        WireKind::Document,
        WireKind::Array,
        WireKind::Binary,
        WireKind::Undefined,
        WireKind::ObjectId,
        WireKind::Boolean,
        WireKind::DateTime,
        WireKind::Null,
        WireKind::Regex,
        WireKind::DbPointer,
        WireKind::JavaScript,
        WireKind::Symbol,
        WireKind::CodeWithScope,
        WireKind::Int32,
        WireKind::Timestamp,
        WireKind::Int64,
        WireKind::Decimal128,
        WireKind::MinKey,
        WireKind::MaxKey,
    ];

    /// Which unification category this kind belongs to
    pub fn category(self) -> Category {
        match self {
            WireKind::Document => Category::Document,
            WireKind::Array => Category::Array,
            _ => Category::Scalar,
        }
    }

    /// Check if this kind is a composite (document or array)
    pub fn is_composite(self) -> bool {
        self.category() != Category::Scalar
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireKind::Double => "double",
            WireKind::String => "string",
            WireKind::Document => "document",
            WireKind::Array => "array",
            WireKind::Binary => "binary",
            WireKind::Undefined => "undefined",
            WireKind::ObjectId => "object_id",
            WireKind::Boolean => "boolean",
            WireKind::DateTime => "date_time",
            WireKind::Null => "null",
            WireKind::Regex => "regex",
            WireKind::DbPointer => "db_pointer",
            WireKind::JavaScript => "javascript",
            WireKind::Symbol => "symbol",
            WireKind::CodeWithScope => "code_with_scope",
            WireKind::Int32 => "int32",
            WireKind::Timestamp => "timestamp",
            WireKind::Int64 => "int64",
            WireKind::Decimal128 => "decimal128",
            WireKind::MinKey => "min_key",
            WireKind::MaxKey => "max_key",
            WireKind::Unknown(tag) => return write!(f, "unknown({tag:#04x})"),
        };
        f.pad(name)
    }
}

/// How the bundled reader interprets its JSON input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderMode {
    /// Relaxed or canonical extended JSON (type-tag documents recognised)
    #[default]
    Extended,
    /// Plain JSON, numbers narrowed by value
    Simple,
}

/// Forward-only cursor over a document tree.
///
/// Every value the cursor lands on must be consumed exactly once, either by
/// entering it (`enter_document` / `enter_array` and iterating to the end)
/// or by `skip_value`. Readers never rewind.
pub trait ValueReader {
    /// Peek the kind of the value under the cursor without consuming it
    fn current_kind(&self) -> Result<WireKind>;

    /// Step into the document under the cursor
    fn enter_document(&mut self) -> Result<()>;

    /// Step into the array under the cursor
    fn enter_array(&mut self) -> Result<()>;

    /// Advance to the next field of the innermost document.
    ///
    /// `None` marks the normal end of the document; the document is then
    /// fully consumed.
    fn next_field(&mut self) -> Result<Option<(String, WireKind)>>;

    /// Advance to the next element of the innermost array.
    ///
    /// `None` marks the normal end of the array.
    fn next_element(&mut self) -> Result<Option<WireKind>>;

    /// Consume the value under the cursor without materialising it
    fn skip_value(&mut self) -> Result<()>;
}
