//! Integration tests for the public API and the CLI runner
//!
//! Tests the full end-to-end flow: options file → document → inferred schemas → JSON/YAML output

use clap::Parser;
use docshape::cli::{Cli, Runner};
use docshape::{
    infer, load_options, Annotation, Error, ExtJsonReader, FieldSpec, InferenceOptions,
    ReaderMode, ScalarType, SchemaBuilder, SchemaNode, TypeDescriptor,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

const ORDER: &str = r#"{
    "_id": {"$oid": "65a4f1c2e4b0a1b2c3d4e5f6"},
    "placedAt": {"$date": "2024-01-15T10:30:00Z"},
    "total": {"$numberDecimal": "129.90"},
    "quantity": 3,
    "customer": {
        "name": "Ann",
        "email": null,
        "shipping_address": {"city": "NYC", "zip": "10001"}
    },
    "lines": [
        {"sku": "A-1", "qty": 1, "tags": ["new"]},
        {"sku": "B-2", "qty": 2, "tags": ["sale"]}
    ],
    "notes": ["gift", 7]
}"#;

fn temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

fn run(args: &[&str]) -> docshape::Result<String> {
    let mut argv = vec!["docshape"];
    argv.extend_from_slice(args);
    Runner::new(Cli::try_parse_from(argv).unwrap()).execute()
}

// ============================================================================
// Library
// ============================================================================

#[test]
fn test_order_document() {
    let mut reader = ExtJsonReader::parse(ORDER, ReaderMode::Extended).unwrap();
    let result = infer(&mut reader, &InferenceOptions::default()).unwrap();

    let names: Vec<_> = result.schemas().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Example", "Customer", "Shipping_address", "Lines"]);

    let root = result.root();
    let types: Vec<String> = root.fields.iter().map(|f| f.ty.to_string()).collect();
    assert_eq!(
        types,
        vec![
            "object_id",
            "date_time",
            "decimal128",
            "int32",
            "Customer",
            "[]Lines",
            "[]dynamic"
        ]
    );

    let customer = result.get("Customer").unwrap();
    assert_eq!(customer.field("email").unwrap().tag(), "email,omitempty");

    let lines = result.get("Lines").unwrap();
    assert_eq!(lines.field("qty").unwrap().ty, TypeDescriptor::Scalar(ScalarType::Int32));
    assert_eq!(lines.field("tags").unwrap().tag(), "tags,omitempty");
}

#[test]
fn test_builder_with_loaded_options() {
    let config = temp_file("rootSchemaName: Order\nminimizeIntegerSize: true\ntruncateIntegers: true\n");
    let options = load_options(config.path()).unwrap();

    let result = SchemaBuilder::with_options(options)
        .build_from_str(r#"{"qty": 3, "price": 9.5}"#, ReaderMode::Extended)
        .unwrap();

    let expected = SchemaNode::new(
        "Order",
        vec![
            FieldSpec::new("qty", TypeDescriptor::Scalar(ScalarType::Int32))
                .with_annotation(Annotation::Truncate),
            FieldSpec::new("price", TypeDescriptor::Scalar(ScalarType::Double)),
        ],
    );
    assert_eq!(result.root(), &expected);
}

#[test]
fn test_independent_runs() {
    let builder = SchemaBuilder::new();
    let first = builder.build_from_str(ORDER, ReaderMode::Extended).unwrap();
    let second = builder.build_from_str(ORDER, ReaderMode::Extended).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_simple_mode_reads_type_tags_as_documents() {
    let result = SchemaBuilder::new()
        .build_from_str(ORDER, ReaderMode::Simple)
        .unwrap();

    assert_eq!(result.root().field("_id").unwrap().ty.to_string(), "_id");
    assert_eq!(result.get("_id").unwrap().fields[0].key, "$oid");
    assert!(result.get("PlacedAt").is_some());
}

#[test]
fn test_error_carries_field_path() {
    let err = SchemaBuilder::new()
        .build_from_str(
            r#"{"lines": [{"sku": "a"}, {"sku": {"$numberInt": "x"}}]}"#,
            ReaderMode::Extended,
        )
        .unwrap_err();

    assert_eq!(err.path(), Some("lines[1]"));
    assert!(matches!(err.root_cause(), Error::Reader { .. }));
}

// ============================================================================
// CLI
// ============================================================================

#[test]
fn test_cli_json_output() {
    let input = temp_file(r#"{"name": "Ann", "addr": {"city": "NYC"}}"#);
    let output = run(&["infer", input.path().to_str().unwrap()]).unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        value,
        json!([
            {
                "name": "Example",
                "fields": [
                    {"key": "name", "type": {"scalar": "string"}},
                    {"key": "addr", "type": {"document": "Addr"}}
                ]
            },
            {
                "name": "Addr",
                "fields": [{"key": "city", "type": {"scalar": "string"}}]
            }
        ])
    );
}

#[test]
fn test_cli_yaml_output_with_config() {
    let config = temp_file("root_schema_name: Reading\nminimize_integer_size: false\n");
    let input = temp_file(r#"{"value": 42}"#);

    let output = run(&[
        "--format",
        "yaml",
        "-C",
        config.path().to_str().unwrap(),
        "infer",
        input.path().to_str().unwrap(),
    ])
    .unwrap();

    let value: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();
    assert_eq!(value[0]["name"], serde_yaml::Value::from("Reading"));
    assert_eq!(
        value[0]["fields"][0]["type"]["scalar"],
        serde_yaml::Value::from("double")
    );
}

#[test]
fn test_cli_depth_limit_flag() {
    let input = temp_file(r#"{"matrix": [[1, 2], [3]]}"#);
    let output = run(&[
        "--format",
        "pretty",
        "infer",
        input.path().to_str().unwrap(),
        "--array-depth-limit",
        "1",
    ])
    .unwrap();

    assert_eq!(output, "Example\n  matrix: []dynamic `matrix,omitempty`\n");
}

#[test]
fn test_cli_rejects_root_array() {
    let input = temp_file("[1, 2, 3]");
    let err = run(&["infer", input.path().to_str().unwrap()]).unwrap_err();
    assert_eq!(err.to_string(), "Expecting a document type, received array");
}

#[test]
fn test_cli_kinds_json() {
    let output = run(&["kinds", "--truncate-integers"]).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();

    assert_eq!(rows.len(), 19);
    let int64 = rows.iter().find(|row| row["kind"] == "int64").unwrap();
    assert_eq!(
        int64,
        &json!({"kind": "int64", "type": {"scalar": "int64"}, "annotations": ["truncate"]})
    );
}
