//! Value classification
//!
//! Maps one scalar wire kind to its semantic type and serialization hints.

use super::types::{Annotation, ScalarType, TypeDescriptor};
use crate::config::InferenceOptions;
use crate::error::{Error, Result};
use crate::reader::WireKind;

/// Outcome of classifying one value
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Inferred type
    pub ty: TypeDescriptor,
    /// Hints for the field holding the value
    pub annotations: Vec<Annotation>,
}

impl Classification {
    fn scalar(scalar: ScalarType) -> Self {
        Self {
            ty: TypeDescriptor::Scalar(scalar),
            annotations: Vec::new(),
        }
    }

    fn dynamic() -> Self {
        Self {
            ty: TypeDescriptor::Dynamic,
            annotations: vec![Annotation::OmitEmpty],
        }
    }
}

/// Classify a wire kind under the given options.
///
/// Integers narrow to `Int32`/`Int64` only when `minimize_integer_size` is
/// set, otherwise they widen to `Double` like untyped JSON numbers. Null is
/// dynamic and always `OmitEmpty`. Unrecognised kinds fail with
/// [`Error::UnknownType`].
pub fn classify(kind: WireKind, options: &InferenceOptions) -> Result<Classification> {
    let scalar = match kind {
        WireKind::Double => ScalarType::Double,
        WireKind::String => ScalarType::String,
        WireKind::Boolean => ScalarType::Boolean,
        WireKind::Int32 | WireKind::Int64 => return Ok(integer(kind, options)),
        WireKind::Binary => ScalarType::Binary,
        WireKind::Undefined => ScalarType::Undefined,
        WireKind::ObjectId => ScalarType::ObjectId,
        WireKind::DateTime => ScalarType::DateTime,
        WireKind::Regex => ScalarType::Regex,
        WireKind::DbPointer => ScalarType::DbPointer,
        WireKind::JavaScript => ScalarType::JavaScript,
        WireKind::Symbol => ScalarType::Symbol,
        WireKind::CodeWithScope => ScalarType::CodeWithScope,
        WireKind::Timestamp => ScalarType::Timestamp,
        WireKind::Decimal128 => ScalarType::Decimal128,
        WireKind::MinKey => ScalarType::MinKey,
        WireKind::MaxKey => ScalarType::MaxKey,
        // Composites are typed by the builder and unifier; anything reaching
        // here has no better description than dynamic.
        WireKind::Null | WireKind::Document | WireKind::Array => {
            return Ok(Classification::dynamic())
        }
        WireKind::Unknown(_) => return Err(Error::UnknownType { kind }),
    };
    Ok(Classification::scalar(scalar))
}

fn integer(kind: WireKind, options: &InferenceOptions) -> Classification {
    if !options.minimize_integer_size {
        return Classification::scalar(ScalarType::Double);
    }

    let scalar = if kind == WireKind::Int32 {
        ScalarType::Int32
    } else {
        ScalarType::Int64
    };
    let mut classification = Classification::scalar(scalar);
    if options.truncate_integers {
        classification.annotations.push(Annotation::Truncate);
    }
    classification
}
