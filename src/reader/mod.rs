//! Document reader module
//!
//! The inference engine walks documents through the [`ValueReader`] cursor
//! contract. This module defines that contract and ships one
//! implementation over JSON and extended JSON text.
//!
//! # Overview
//!
//! - [`WireKind`] is the type tag reported for the value under the cursor
//! - [`ValueReader`] is the forward-only cursor (enter, iterate, skip)
//! - [`ExtJsonReader`] parses JSON once and serves it through the cursor,
//!   recognising `$oid`, `$date`, `$numberLong` and the other type-tag
//!   documents in [`ReaderMode::Extended`]

mod extjson;
mod types;

pub use extjson::{wire_kind, ExtJsonReader};
pub use types::{Category, ReaderMode, ValueReader, WireKind};
