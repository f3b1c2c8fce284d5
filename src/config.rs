//! Inference configuration
//!
//! Read-only options shared by the classifier, unifier and builder. Options
//! can be built in code or loaded from a YAML / JSON file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default name of the top-level schema
pub const DEFAULT_ROOT_SCHEMA_NAME: &str = "Example";

/// Default number of array-within-array levels typed precisely
pub const DEFAULT_ARRAY_DEPTH_LIMIT: usize = 2;

// ============================================================================
// Options
// ============================================================================

/// Options for one inference run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceOptions {
    /// Name of the top-level schema
    #[serde(alias = "rootSchemaName")]
    pub root_schema_name: String,

    /// Narrow integers to fixed-width types instead of double
    #[serde(alias = "minimizeIntegerSize")]
    pub minimize_integer_size: bool,

    /// Mark narrowed integers as truncatable (no effect without
    /// `minimize_integer_size`)
    #[serde(alias = "truncateIntegers")]
    pub truncate_integers: bool,

    /// Array-within-array levels typed precisely before falling back to
    /// dynamic
    #[serde(alias = "arrayDepthLimit")]
    pub array_depth_limit: usize,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            root_schema_name: DEFAULT_ROOT_SCHEMA_NAME.to_string(),
            minimize_integer_size: true,
            truncate_integers: false,
            array_depth_limit: DEFAULT_ARRAY_DEPTH_LIMIT,
        }
    }
}

impl InferenceOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root schema name
    #[must_use]
    pub fn with_root_schema_name(mut self, name: impl Into<String>) -> Self {
        self.root_schema_name = name.into();
        self
    }

    /// Enable/disable integer narrowing
    #[must_use]
    pub fn with_minimize_integer_size(mut self, enabled: bool) -> Self {
        self.minimize_integer_size = enabled;
        self
    }

    /// Enable/disable the truncate marker on narrowed integers
    #[must_use]
    pub fn with_truncate_integers(mut self, enabled: bool) -> Self {
        self.truncate_integers = enabled;
        self
    }

    /// Set the array nesting limit
    #[must_use]
    pub fn with_array_depth_limit(mut self, limit: usize) -> Self {
        self.array_depth_limit = limit;
        self
    }

    /// Validate option values
    pub fn validate(&self) -> Result<()> {
        if self.root_schema_name.trim().is_empty() {
            return Err(Error::config("root_schema_name cannot be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load options from a YAML or JSON file
pub fn load_options(path: impl AsRef<Path>) -> Result<InferenceOptions> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read options file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_options_from_str(&content)
}

/// Load options from a YAML or JSON string
pub fn load_options_from_str(content: &str) -> Result<InferenceOptions> {
    // YAML is a superset of JSON, so one parser covers both
    let options: InferenceOptions = serde_yaml::from_str(content)
        .map_err(|e| Error::config(format!("Failed to parse options: {e}")))?;
    options.validate()?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = InferenceOptions::default();
        assert_eq!(options.root_schema_name, "Example");
        assert!(options.minimize_integer_size);
        assert!(!options.truncate_integers);
        assert_eq!(options.array_depth_limit, 2);
    }

    #[test]
    fn test_builder_methods() {
        let options = InferenceOptions::new()
            .with_root_schema_name("CustomStruct")
            .with_minimize_integer_size(false)
            .with_truncate_integers(true)
            .with_array_depth_limit(3);

        assert_eq!(options.root_schema_name, "CustomStruct");
        assert!(!options.minimize_integer_size);
        assert!(options.truncate_integers);
        assert_eq!(options.array_depth_limit, 3);
    }

    #[test]
    fn test_load_yaml_partial() {
        let options = load_options_from_str("root_schema_name: Order\ntruncate_integers: true\n")
            .unwrap();

        assert_eq!(
            options,
            InferenceOptions::default()
                .with_root_schema_name("Order")
                .with_truncate_integers(true)
        );
    }

    #[test]
    fn test_load_json_with_camel_case_keys() {
        let options =
            load_options_from_str(r#"{"rootSchemaName": "Doc", "minimizeIntegerSize": false}"#)
                .unwrap();
        assert_eq!(options.root_schema_name, "Doc");
        assert!(!options.minimize_integer_size);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = load_options_from_str("minimise: true").unwrap_err();
        assert!(err.to_string().contains("Failed to parse options"));
    }

    #[test]
    fn test_empty_root_name_rejected() {
        let err = load_options_from_str("root_schema_name: ''").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "array_depth_limit: 1").unwrap();

        let options = load_options(file.path()).unwrap();
        assert_eq!(options.array_depth_limit, 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_options("/nonexistent/options.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read options file"));
    }
}
