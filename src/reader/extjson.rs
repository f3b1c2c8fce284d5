//! Extended JSON reader
//!
//! Parses JSON text once and walks it with the forward-only cursor
//! contract. Type-tag documents (`{"$oid": ...}`, `{"$numberLong": ...}`,
//! ...) are reported as their scalar wire kinds in extended mode.

use super::types::{ReaderMode, ValueReader, WireKind};
use crate::error::{Error, Result};
use base64::Engine as _;
use serde_json::{Map, Number, Value};

// ============================================================================
// Reader
// ============================================================================

/// One open composite on the cursor stack
enum Frame {
    Document(serde_json::map::IntoIter),
    Array(std::vec::IntoIter<Value>),
}

/// Cursor over a parsed JSON / extended JSON document
pub struct ExtJsonReader {
    mode: ReaderMode,
    stack: Vec<Frame>,
    /// Value under the cursor, `None` once consumed
    current: Option<Value>,
}

impl ExtJsonReader {
    /// Create a reader positioned at `root`
    pub fn new(root: Value, mode: ReaderMode) -> Self {
        Self {
            mode,
            stack: Vec::new(),
            current: Some(root),
        }
    }

    /// Parse `input` and position the reader at its top-level value
    pub fn parse(input: &str, mode: ReaderMode) -> Result<Self> {
        let root: Value = serde_json::from_str(input)
            .map_err(|e| Error::reader(format!("invalid JSON input: {e}")))?;
        Ok(Self::new(root, mode))
    }

    /// The interpretation mode of this reader
    pub fn mode(&self) -> ReaderMode {
        self.mode
    }

    /// Check that the previous value was entered or skipped before moving on
    fn ensure_consumed(&self) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::reader(
                "previous value was neither entered nor skipped",
            ));
        }
        Ok(())
    }
}

impl ValueReader for ExtJsonReader {
    fn current_kind(&self) -> Result<WireKind> {
        let value = self
            .current
            .as_ref()
            .ok_or_else(|| Error::reader("no value under the cursor"))?;
        wire_kind(value, self.mode)
    }

    fn enter_document(&mut self) -> Result<()> {
        let found = self.current_kind()?;
        if found != WireKind::Document {
            return Err(Error::NotADocument { found });
        }
        match self.current.take() {
            Some(Value::Object(map)) => {
                self.stack.push(Frame::Document(map.into_iter()));
                Ok(())
            }
            _ => Err(Error::NotADocument { found }),
        }
    }

    fn enter_array(&mut self) -> Result<()> {
        let found = self.current_kind()?;
        if found != WireKind::Array {
            return Err(Error::NotAnArray { found });
        }
        match self.current.take() {
            Some(Value::Array(items)) => {
                self.stack.push(Frame::Array(items.into_iter()));
                Ok(())
            }
            _ => Err(Error::NotAnArray { found }),
        }
    }

    fn next_field(&mut self) -> Result<Option<(String, WireKind)>> {
        self.ensure_consumed()?;
        let next = match self.stack.last_mut() {
            Some(Frame::Document(fields)) => fields.next(),
            _ => return Err(Error::reader("cursor is not inside a document")),
        };
        match next {
            Some((key, value)) => {
                let kind = wire_kind(&value, self.mode)?;
                self.current = Some(value);
                Ok(Some((key, kind)))
            }
            None => {
                self.stack.pop();
                Ok(None)
            }
        }
    }

    fn next_element(&mut self) -> Result<Option<WireKind>> {
        self.ensure_consumed()?;
        let next = match self.stack.last_mut() {
            Some(Frame::Array(items)) => items.next(),
            _ => return Err(Error::reader("cursor is not inside an array")),
        };
        match next {
            Some(value) => {
                let kind = wire_kind(&value, self.mode)?;
                self.current = Some(value);
                Ok(Some(kind))
            }
            None => {
                self.stack.pop();
                Ok(None)
            }
        }
    }

    fn skip_value(&mut self) -> Result<()> {
        self.current
            .take()
            .map(|_| ())
            .ok_or_else(|| Error::reader("no value under the cursor to skip"))
    }
}

// ============================================================================
// Kind detection
// ============================================================================

/// Determine the wire kind of a parsed JSON value
pub fn wire_kind(value: &Value, mode: ReaderMode) -> Result<WireKind> {
    Ok(match value {
        Value::Null => WireKind::Null,
        Value::Bool(_) => WireKind::Boolean,
        Value::String(_) => WireKind::String,
        Value::Number(n) => number_kind(n, mode),
        Value::Array(_) => WireKind::Array,
        Value::Object(map) => match mode {
            ReaderMode::Extended => type_tag_kind(map)?.unwrap_or(WireKind::Document),
            ReaderMode::Simple => WireKind::Document,
        },
    })
}

/// Classify a JSON number literal.
///
/// Extended mode follows the relaxed extended JSON rules: integer literals
/// are int32 or int64 by magnitude, anything else is a double. Simple mode
/// judges the value itself, so `5.0` narrows like `5`.
fn number_kind(n: &Number, mode: ReaderMode) -> WireKind {
    if let Some(i) = n.as_i64() {
        return if i32::try_from(i).is_ok() {
            WireKind::Int32
        } else {
            WireKind::Int64
        };
    }

    match (mode, n.as_f64()) {
        (ReaderMode::Simple, Some(f)) if f.fract() == 0.0 => {
            if f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
                WireKind::Int32
            } else if f >= -9_223_372_036_854_775_808.0 && f < 9_223_372_036_854_775_808.0 {
                WireKind::Int64
            } else {
                WireKind::Double
            }
        }
        _ => WireKind::Double,
    }
}

/// Primary keys of type-tag documents, with the extra keys each may carry
const TYPE_TAGS: &[(&str, &[&str])] = &[
    ("$oid", &[]),
    ("$symbol", &[]),
    ("$numberInt", &[]),
    ("$numberLong", &[]),
    ("$numberDouble", &[]),
    ("$numberDecimal", &[]),
    ("$binary", &["$type"]),
    ("$code", &["$scope"]),
    ("$timestamp", &[]),
    ("$regularExpression", &[]),
    ("$regex", &["$options"]),
    ("$dbPointer", &[]),
    ("$date", &[]),
    ("$minKey", &[]),
    ("$maxKey", &[]),
    ("$undefined", &[]),
];

/// Detect a type-tag document and validate its payload.
///
/// Only the first key decides; the legacy `$type`/`$binary` and
/// `$options`/`$regex` pairs may come in either order. Returns `Ok(None)`
/// for ordinary documents.
fn type_tag_kind(map: &Map<String, Value>) -> Result<Option<WireKind>> {
    let Some(first) = map.keys().next() else {
        return Ok(None);
    };
    let primary = match first.as_str() {
        "$type" => "$binary",
        "$options" => "$regex",
        other => other,
    };
    let Some((tag, extras)) = TYPE_TAGS
        .iter()
        .find(|(tag, _)| *tag == primary)
        .copied()
    else {
        return Ok(None);
    };
    let Some(payload) = map.get(tag) else {
        return Ok(None);
    };

    // `{"$regex": {...}}` is a query operator, not a legacy regex
    if tag == "$regex" && !(payload.is_string() && map.contains_key("$options")) {
        return Ok(None);
    }

    if let Some(unexpected) = map
        .keys()
        .find(|key| key.as_str() != tag && !extras.contains(&key.as_str()))
    {
        return Err(Error::reader(format!(
            "unexpected key `{unexpected}` in {tag} document"
        )));
    }

    let kind = match tag {
        "$oid" => {
            object_id(payload, tag)?;
            WireKind::ObjectId
        }
        "$symbol" => {
            string_payload(payload, tag)?;
            WireKind::Symbol
        }
        "$numberInt" => {
            string_payload(payload, tag)?
                .parse::<i32>()
                .map_err(|e| invalid(tag, e))?;
            WireKind::Int32
        }
        "$numberLong" => {
            string_payload(payload, tag)?
                .parse::<i64>()
                .map_err(|e| invalid(tag, e))?;
            WireKind::Int64
        }
        "$numberDouble" => {
            float_string(string_payload(payload, tag)?, tag)?;
            WireKind::Double
        }
        "$numberDecimal" => {
            float_string(string_payload(payload, tag)?, tag)?;
            WireKind::Decimal128
        }
        "$binary" => {
            binary(map, payload)?;
            WireKind::Binary
        }
        "$code" => {
            string_payload(payload, tag)?;
            match map.get("$scope") {
                Some(Value::Object(_)) => WireKind::CodeWithScope,
                Some(_) => return Err(invalid("$scope", "expected a document")),
                None => WireKind::JavaScript,
            }
        }
        "$timestamp" => {
            let fields = object_payload(payload, tag, &["t", "i"])?;
            for part in ["t", "i"] {
                fields
                    .get(part)
                    .and_then(Value::as_u64)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| invalid(tag, format!("`{part}` must be a 32-bit unsigned integer")))?;
            }
            WireKind::Timestamp
        }
        "$regularExpression" => {
            let fields = object_payload(payload, tag, &["pattern", "options"])?;
            for part in ["pattern", "options"] {
                if !fields.get(part).is_some_and(Value::is_string) {
                    return Err(invalid(tag, format!("`{part}` must be a string")));
                }
            }
            WireKind::Regex
        }
        "$regex" => {
            string_payload(&map["$options"], "$options")?;
            WireKind::Regex
        }
        "$dbPointer" => {
            let fields = object_payload(payload, tag, &["$ref", "$id"])?;
            string_payload(&fields["$ref"], "$ref")?;
            match &fields["$id"] {
                Value::Object(id) if id.len() == 1 && id.contains_key("$oid") => {
                    object_id(&id["$oid"], "$oid")?;
                }
                _ => return Err(invalid(tag, "`$id` must be an $oid document")),
            }
            WireKind::DbPointer
        }
        "$date" => {
            date(payload)?;
            WireKind::DateTime
        }
        "$minKey" | "$maxKey" => {
            if payload.as_i64() != Some(1) {
                return Err(invalid(tag, "expected the value 1"));
            }
            if tag == "$minKey" {
                WireKind::MinKey
            } else {
                WireKind::MaxKey
            }
        }
        "$undefined" => {
            if payload != &Value::Bool(true) {
                return Err(invalid(tag, "expected the value true"));
            }
            WireKind::Undefined
        }
        _ => return Ok(None),
    };

    Ok(Some(kind))
}

// ============================================================================
// Payload validation helpers
// ============================================================================

fn invalid(tag: &str, reason: impl std::fmt::Display) -> Error {
    Error::reader(format!("invalid {tag} value: {reason}"))
}

fn string_payload<'a>(payload: &'a Value, tag: &str) -> Result<&'a str> {
    payload
        .as_str()
        .ok_or_else(|| invalid(tag, "expected a string"))
}

/// Require a document payload with exactly the given keys
fn object_payload<'a>(
    payload: &'a Value,
    tag: &str,
    keys: &[&str],
) -> Result<&'a Map<String, Value>> {
    let fields = payload
        .as_object()
        .ok_or_else(|| invalid(tag, "expected a document"))?;
    if fields.len() != keys.len() || !keys.iter().all(|key| fields.contains_key(*key)) {
        return Err(invalid(tag, format!("expected keys {}", keys.join(", "))));
    }
    Ok(fields)
}

fn object_id(payload: &Value, tag: &str) -> Result<()> {
    let hex = string_payload(payload, tag)?;
    if hex.len() != 24 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid(tag, "expected 24 hex characters"));
    }
    Ok(())
}

fn float_string(text: &str, tag: &str) -> Result<()> {
    if matches!(text, "Infinity" | "-Infinity" | "NaN") {
        return Ok(());
    }
    // `str::parse` also takes `inf`, `nan` and friends in any case
    if text
        .chars()
        .any(|c| c.is_ascii_alphabetic() && !matches!(c, 'e' | 'E'))
    {
        return Err(invalid(tag, "expected a decimal number, Infinity, -Infinity or NaN"));
    }
    text.parse::<f64>().map(|_| ()).map_err(|e| invalid(tag, e))
}

/// Validate `{"$binary": {"base64": ..., "subType": ...}}` or the legacy
/// `{"$binary": "...", "$type": "..."}` form
fn binary(map: &Map<String, Value>, payload: &Value) -> Result<()> {
    let (data, sub_type) = match (payload, map.get("$type")) {
        (Value::Object(_), None) => {
            let fields = object_payload(payload, "$binary", &["base64", "subType"])?;
            (
                string_payload(&fields["base64"], "base64")?,
                string_payload(&fields["subType"], "subType")?,
            )
        }
        (Value::String(data), Some(sub_type)) => {
            (data.as_str(), string_payload(sub_type, "$type")?)
        }
        _ => return Err(invalid("$binary", "expected base64 and subType")),
    };

    if sub_type.is_empty()
        || sub_type.len() > 2
        || u8::from_str_radix(sub_type, 16).is_err()
    {
        return Err(invalid("$binary", "subType must be one or two hex digits"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| invalid("$binary", e))?;
    Ok(())
}

/// Validate a `$date` payload: ISO-8601 string, `$numberLong` document, or
/// integer milliseconds
fn date(payload: &Value) -> Result<()> {
    match payload {
        Value::String(text) => chrono::DateTime::parse_from_rfc3339(text)
            .map(|_| ())
            .map_err(|e| invalid("$date", e)),
        Value::Number(n) if n.is_i64() => Ok(()),
        Value::Object(inner) if inner.len() == 1 => {
            let millis = inner
                .get("$numberLong")
                .ok_or_else(|| invalid("$date", "expected a $numberLong document"))?;
            string_payload(millis, "$numberLong")?
                .parse::<i64>()
                .map(|_| ())
                .map_err(|e| invalid("$date", e))
        }
        _ => Err(invalid("$date", "expected an ISO-8601 string or milliseconds")),
    }
}
