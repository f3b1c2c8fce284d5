//! Schema types
//!
//! The inferred model: scalar types, type descriptors, fields and named
//! schema nodes, plus the ordered result of one inference run.

use serde::{Serialize, Serializer};
use std::fmt;

/// Semantic scalar type of a field or array element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Double,
    String,
    Boolean,
    Int32,
    Int64,
    Binary,
    Undefined,
    ObjectId,
    DateTime,
    Regex,
    DbPointer,
    JavaScript,
    Symbol,
    CodeWithScope,
    Timestamp,
    Decimal128,
    MinKey,
    MaxKey,
}

impl ScalarType {
    /// Check if this is a fixed-width integer type
    pub fn is_integer(self) -> bool {
        matches!(self, ScalarType::Int32 | ScalarType::Int64)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Double => "double",
            ScalarType::String => "string",
            ScalarType::Boolean => "boolean",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Binary => "binary",
            ScalarType::Undefined => "undefined",
            ScalarType::ObjectId => "object_id",
            ScalarType::DateTime => "date_time",
            ScalarType::Regex => "regex",
            ScalarType::DbPointer => "db_pointer",
            ScalarType::JavaScript => "javascript",
            ScalarType::Symbol => "symbol",
            ScalarType::CodeWithScope => "code_with_scope",
            ScalarType::Timestamp => "timestamp",
            ScalarType::Decimal128 => "decimal128",
            ScalarType::MinKey => "min_key",
            ScalarType::MaxKey => "max_key",
        };
        f.write_str(name)
    }
}

/// Serialization hint attached to a field.
///
/// Declaration order is tag order: `omitempty` always precedes `truncate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Annotation {
    /// The value may be absent or empty (nullable, dynamic or array-typed)
    OmitEmpty,
    /// The value was narrowed to a fixed-width integer and may be truncated
    Truncate,
}

impl Annotation {
    /// Tag text used in a field's serialization tag
    pub fn tag(self) -> &'static str {
        match self {
            Annotation::OmitEmpty => "omitempty",
            Annotation::Truncate => "truncate",
        }
    }
}

/// Type of a field or array element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// A fixed scalar type
    Scalar(ScalarType),
    /// A reference to a named nested schema
    #[serde(serialize_with = "serialize_schema_name")]
    Document(SchemaNode),
    /// An array of the inner type
    Array(Box<TypeDescriptor>),
    /// No common type could be inferred
    Dynamic,
}

fn serialize_schema_name<S: Serializer>(node: &SchemaNode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&node.name)
}

impl TypeDescriptor {
    /// Create an array descriptor
    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }

    /// Structural equality: same tag and recursively equal payload.
    ///
    /// Document references compare by their field lists; schema names are
    /// ignored.
    pub fn same_shape(&self, other: &TypeDescriptor) -> bool {
        match (self, other) {
            (TypeDescriptor::Scalar(a), TypeDescriptor::Scalar(b)) => a == b,
            (TypeDescriptor::Document(a), TypeDescriptor::Document(b)) => a.same_shape(b),
            (TypeDescriptor::Array(a), TypeDescriptor::Array(b)) => a.same_shape(b),
            (TypeDescriptor::Dynamic, TypeDescriptor::Dynamic) => true,
            _ => false,
        }
    }

    /// Check if this descriptor is the dynamic fallback
    pub fn is_dynamic(&self) -> bool {
        matches!(self, TypeDescriptor::Dynamic)
    }

    /// Element type, if this is an array descriptor
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Array(inner) => Some(inner),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(scalar) => write!(f, "{scalar}"),
            TypeDescriptor::Document(node) => f.write_str(&node.name),
            TypeDescriptor::Array(inner) => write!(f, "[]{inner}"),
            TypeDescriptor::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// One field of a schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Original source key, used as the wire name
    pub key: String,

    /// Inferred type
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,

    /// Serialization hints, kept in declaration order without duplicates
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl FieldSpec {
    /// Create a field without annotations
    pub fn new(key: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            key: key.into(),
            ty,
            annotations: Vec::new(),
        }
    }

    /// Add an annotation
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
            self.annotations.sort_unstable();
        }
        self
    }

    /// Add several annotations
    #[must_use]
    pub fn with_annotations(self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        annotations
            .into_iter()
            .fold(self, FieldSpec::with_annotation)
    }

    /// Check if the field carries an annotation
    pub fn has(&self, annotation: Annotation) -> bool {
        self.annotations.contains(&annotation)
    }

    /// Serialization tag: the key followed by annotation tags, e.g.
    /// `tags,omitempty` or `count,truncate`
    pub fn tag(&self) -> String {
        std::iter::once(self.key.as_str())
            .chain(self.annotations.iter().map(|a| a.tag()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Structural equality ignoring nested schema names
    pub fn same_shape(&self, other: &FieldSpec) -> bool {
        self.key == other.key
            && self.annotations == other.annotations
            && self.ty.same_shape(&other.ty)
    }
}

/// A named record type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaNode {
    /// Schema name (title-cased field key, or the root name)
    pub name: String,

    /// Fields in document key order
    pub fields: Vec<FieldSpec>,
}

impl SchemaNode {
    /// Create a schema node
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Get a field by key
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Compare field lists structurally; names are not compared
    pub fn same_shape(&self, other: &SchemaNode) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.same_shape(b))
    }
}

impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for field in &self.fields {
            writeln!(f, "  {}: {} `{}`", field.key, field.ty, field.tag())?;
        }
        Ok(())
    }
}

/// Nesting level carried through the recursive walk.
///
/// Documents and arrays share one counter: the root document is level 0
/// and every nested document or array adds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Depth(usize);

impl Depth {
    /// Level of the root document
    pub fn root() -> Self {
        Self::default()
    }

    /// Level one step further down
    #[must_use]
    pub fn nested(self) -> Self {
        Self(self.0 + 1)
    }

    /// Numeric level
    pub fn level(self) -> usize {
        self.0
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered schemas from one inference run: root first, then every nested
/// schema in discovery order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InferenceResult {
    schemas: Vec<SchemaNode>,
}

impl InferenceResult {
    /// Assemble a result from a root schema and the schemas found beneath it
    pub fn new(root: SchemaNode, nested: Vec<SchemaNode>) -> Self {
        let mut schemas = Vec::with_capacity(nested.len() + 1);
        schemas.push(root);
        schemas.extend(nested);
        Self { schemas }
    }

    /// The root schema
    pub fn root(&self) -> &SchemaNode {
        &self.schemas[0]
    }

    /// First schema with the given name
    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// All schemas in output order
    pub fn schemas(&self) -> &[SchemaNode] {
        &self.schemas
    }

    /// Number of schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Always false: a result holds at least the root schema
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Take ownership of the schemas
    pub fn into_schemas(self) -> Vec<SchemaNode> {
        self.schemas
    }
}

impl fmt::Display for InferenceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, schema) in self.schemas.iter().enumerate() {
            if idx != 0 {
                writeln!(f)?;
            }
            write!(f, "{schema}")?;
        }
        Ok(())
    }
}
