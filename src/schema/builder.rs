//! Document schema building
//!
//! Walks a document's fields, delegating scalars to the classifier and
//! arrays to the unifier, and recursing into nested documents. Each
//! document yields one named schema plus the schemas found beneath it.

use super::classify::{classify, Classification};
use super::types::{Annotation, Depth, FieldSpec, InferenceResult, SchemaNode, TypeDescriptor};
use super::unify::unify_array;
use crate::config::InferenceOptions;
use crate::error::{Error, Result, ResultExt};
use crate::reader::{ExtJsonReader, ReaderMode, ValueReader, WireKind};
use tracing::debug;

// ============================================================================
// Builder
// ============================================================================

/// Schema builder with configuration options
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    options: InferenceOptions,
}

impl SchemaBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from existing options
    pub fn with_options(options: InferenceOptions) -> Self {
        Self { options }
    }

    /// Set the root schema name
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.options.root_schema_name = name.into();
        self
    }

    /// Enable/disable integer narrowing
    #[must_use]
    pub fn with_minimize_integer_size(mut self, enabled: bool) -> Self {
        self.options.minimize_integer_size = enabled;
        self
    }

    /// Enable/disable the truncate marker on narrowed integers
    #[must_use]
    pub fn with_truncate_integers(mut self, enabled: bool) -> Self {
        self.options.truncate_integers = enabled;
        self
    }

    /// Set the array nesting limit
    #[must_use]
    pub fn with_array_depth_limit(mut self, limit: usize) -> Self {
        self.options.array_depth_limit = limit;
        self
    }

    /// The options this builder runs with
    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    /// Infer schemas from the document under the reader's cursor
    pub fn build<R: ValueReader + ?Sized>(&self, reader: &mut R) -> Result<InferenceResult> {
        infer(reader, &self.options)
    }

    /// Parse `input` and infer schemas from it
    pub fn build_from_str(&self, input: &str, mode: ReaderMode) -> Result<InferenceResult> {
        infer_from_str(input, mode, &self.options)
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Infer schemas from the document under the reader's cursor.
///
/// The root schema is named `options.root_schema_name` and comes first in
/// the result, followed by every nested schema in discovery order.
pub fn infer<R: ValueReader + ?Sized>(
    reader: &mut R,
    options: &InferenceOptions,
) -> Result<InferenceResult> {
    let (root, nested) = build_document(reader, options, &options.root_schema_name, Depth::root())?;
    debug!(
        "Inferred {} schema(s) rooted at '{}'",
        nested.len() + 1,
        root.name
    );
    Ok(InferenceResult::new(root, nested))
}

/// Parse JSON / extended JSON text and infer schemas from it
pub fn infer_from_str(
    input: &str,
    mode: ReaderMode,
    options: &InferenceOptions,
) -> Result<InferenceResult> {
    let mut reader = ExtJsonReader::parse(input, mode)?;
    infer(&mut reader, options)
}

/// Build the schema for the document under the cursor.
///
/// Returns the document's own schema and, separately, every schema
/// discovered beneath it in discovery order.
pub fn build_document<R: ValueReader + ?Sized>(
    reader: &mut R,
    options: &InferenceOptions,
    schema_name: &str,
    depth: Depth,
) -> Result<(SchemaNode, Vec<SchemaNode>)> {
    let found = reader.current_kind()?;
    if found != WireKind::Document {
        return Err(Error::NotADocument { found });
    }
    reader.enter_document()?;

    let mut fields = Vec::new();
    let mut nested = Vec::new();
    while let Some((key, kind)) = reader.next_field()? {
        let field = match kind {
            WireKind::Array => {
                let unified =
                    unify_array(reader, options, &key, depth.nested()).in_field(&key)?;
                nested.extend(unified.schemas);
                FieldSpec::new(key, unified.ty).with_annotation(Annotation::OmitEmpty)
            }
            WireKind::Document => {
                let child_name = title_case(&key);
                let (child, grandchildren) =
                    build_document(reader, options, &child_name, depth.nested())
                        .in_field(&key)?;
                let ty = TypeDescriptor::Document(child.clone());
                nested.push(child);
                nested.extend(grandchildren);
                FieldSpec::new(key, ty)
            }
            _ => {
                let Classification { ty, annotations } = classify(kind, options).in_field(&key)?;
                reader.skip_value().in_field(&key)?;
                FieldSpec::new(key, ty).with_annotations(annotations)
            }
        };
        fields.push(field);
    }

    debug!(
        "Built schema '{}' with {} field(s) at depth {}",
        schema_name,
        fields.len(),
        depth
    );
    Ok((SchemaNode::new(schema_name, fields), nested))
}

// ============================================================================
// Naming
// ============================================================================

/// Upper-case the first letter of every word in a field key.
///
/// Word boundaries are ASCII punctuation and whitespace; underscores and
/// digits do not split words, so `home_address` becomes `Home_address`
/// and `zip-code` becomes `Zip-Code`.
pub fn title_case(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    let mut word_start = true;
    for c in key.chars() {
        if word_start {
            name.extend(c.to_uppercase());
        } else {
            name.push(c);
        }
        word_start = if c.is_ascii() {
            !(c.is_ascii_alphanumeric() || c == '_')
        } else {
            c.is_whitespace()
        };
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("addr", "Addr")]
    #[test_case("Addr", "Addr")]
    #[test_case("home_address", "Home_address")]
    #[test_case("zip-code", "Zip-Code")]
    #[test_case("first name", "First Name")]
    #[test_case("a.b", "A.B")]
    #[test_case("2fa", "2fa")]
    #[test_case("émile", "Émile")]
    #[test_case("", "")]
    fn test_title_case(key: &str, expected: &str) {
        assert_eq!(title_case(key), expected);
    }

    #[test]
    fn test_builder_options() {
        let builder = SchemaBuilder::new()
            .with_root_name("Doc")
            .with_minimize_integer_size(false)
            .with_truncate_integers(true)
            .with_array_depth_limit(1);

        assert_eq!(
            builder.options(),
            &InferenceOptions::default()
                .with_root_schema_name("Doc")
                .with_minimize_integer_size(false)
                .with_truncate_integers(true)
                .with_array_depth_limit(1)
        );
    }
}
