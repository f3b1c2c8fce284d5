//! Array unification
//!
//! Decides whether every element of an array shares one inferable type.
//! The first element sets the candidate; any later disagreement degrades
//! the whole array to dynamic.

use super::builder::{build_document, title_case};
use super::classify::classify;
use super::types::{Depth, SchemaNode, TypeDescriptor};
use crate::config::InferenceOptions;
use crate::error::{Result, ResultExt};
use crate::reader::{Category, ValueReader};
use tracing::{debug, trace};

/// Outcome of unifying one array
#[derive(Debug, Clone, PartialEq)]
pub struct Unified {
    /// `Array(element)` where element is the common type or dynamic
    pub ty: TypeDescriptor,
    /// Schemas discovered through the elements, in discovery order
    pub schemas: Vec<SchemaNode>,
}

/// Type and schemas observed for a single element
struct Observed {
    ty: TypeDescriptor,
    schemas: Vec<SchemaNode>,
}

enum State {
    /// No element seen yet
    Empty,
    /// Every element so far matched the first
    Checking {
        category: Category,
        element: TypeDescriptor,
        schemas: Vec<SchemaNode>,
    },
    /// A mismatch was seen; remaining elements are only skipped
    Degraded,
}

/// Unify the array under the cursor.
///
/// `name_hint` is the field key owning the array; document elements are
/// named after it. `depth` is the array's own level, one below its
/// enclosing document. Nested arrays are only typed while
/// `depth < options.array_depth_limit`.
///
/// The array is always fully consumed, even after degrading.
pub fn unify_array<R: ValueReader + ?Sized>(
    reader: &mut R,
    options: &InferenceOptions,
    name_hint: &str,
    depth: Depth,
) -> Result<Unified> {
    reader.enter_array()?;
    let schema_name = title_case(name_hint);

    let mut state = State::Empty;
    let mut index = 0usize;
    while let Some(kind) = reader.next_element()? {
        let segment = format!("[{index}]");
        index += 1;

        if matches!(state, State::Degraded) {
            reader.skip_value().in_field(&segment)?;
            continue;
        }

        let category = kind.category();
        let expected = match &state {
            State::Checking { category, .. } => Some(*category),
            State::Empty | State::Degraded => None,
        };
        if let Some(expected) = expected {
            if expected != category {
                debug!(
                    "Array '{}' mixes {:?} and {:?} elements, falling back to dynamic",
                    name_hint, expected, category
                );
                reader.skip_value().in_field(&segment)?;
                state = State::Degraded;
                continue;
            }
        }

        let observed = match category {
            Category::Scalar => {
                let classified = classify(kind, options).in_field(&segment)?;
                reader.skip_value().in_field(&segment)?;
                Observed {
                    ty: classified.ty,
                    schemas: Vec::new(),
                }
            }
            Category::Document => {
                let (node, nested) =
                    build_document(reader, options, &schema_name, depth.nested())
                        .in_field(&segment)?;
                let ty = TypeDescriptor::Document(node.clone());
                let mut schemas = Vec::with_capacity(nested.len() + 1);
                schemas.push(node);
                schemas.extend(nested);
                Observed { ty, schemas }
            }
            Category::Array => {
                if depth.level() >= options.array_depth_limit {
                    trace!(
                        "Array '{}' at depth {} exceeds nesting limit {}, falling back to dynamic",
                        name_hint,
                        depth,
                        options.array_depth_limit
                    );
                    reader.skip_value().in_field(&segment)?;
                    state = State::Degraded;
                    continue;
                }
                let nested = unify_array(reader, options, name_hint, depth.nested())
                    .in_field(&segment)?;
                Observed {
                    ty: nested.ty,
                    schemas: nested.schemas,
                }
            }
        };

        state = match state {
            State::Empty => State::Checking {
                category,
                element: observed.ty,
                schemas: observed.schemas,
            },
            State::Checking {
                category,
                element,
                schemas,
            } => {
                if element.same_shape(&observed.ty) {
                    State::Checking {
                        category,
                        element,
                        schemas,
                    }
                } else {
                    debug!(
                        "Array '{}' element {} is {} but element 0 is {}, falling back to dynamic",
                        name_hint, segment, observed.ty, element
                    );
                    State::Degraded
                }
            }
            State::Degraded => State::Degraded,
        };
    }

    let (element, schemas) = match state {
        State::Checking {
            element, schemas, ..
        } => (element, schemas),
        State::Empty | State::Degraded => (TypeDescriptor::Dynamic, Vec::new()),
    };

    Ok(Unified {
        ty: TypeDescriptor::array(element),
        schemas,
    })
}
