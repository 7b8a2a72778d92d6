//! The untyped value tree produced by payload extraction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// An untyped value extracted from model output.
///
/// This is the intermediate representation between the payload extractor
/// and the coercer: a plain tree of primitives, sequences, and mappings
/// with mapping key order preserved. A `RawValue` is never mutated in
/// place; coercion reads it and produces a fresh typed tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonValue", into = "JsonValue")]
pub enum RawValue {
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Vec<RawValue>),
    /// A mapping from string keys to values, insertion order preserved.
    Object(IndexMap<String, RawValue>),
}

impl RawValue {
    /// A short name for the shape of this value, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Whether this value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The items, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[RawValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, RawValue>> {
        match self {
            Self::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Render a bounded preview of this value for error messages.
    ///
    /// Long fragments are cut off so a multi-kilobyte model response does
    /// not end up verbatim inside an error string.
    #[must_use]
    pub fn fragment(&self) -> String {
        const MAX_FRAGMENT: usize = 80;
        let rendered = self.to_string();
        if rendered.chars().count() <= MAX_FRAGMENT {
            rendered
        } else {
            let prefix: String = rendered.chars().take(MAX_FRAGMENT).collect();
            format!("{prefix}…")
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json: JsonValue = self.clone().into();
        write!(f, "{json}")
    }
}

impl From<JsonValue> for RawValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter().map(Into::into).collect()),
            JsonValue::Object(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, RawValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<RawValue> for JsonValue {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Null => JsonValue::Null,
            RawValue::Bool(b) => JsonValue::Bool(b),
            RawValue::Int(i) => JsonValue::from(i),
            RawValue::Float(f) => serde_json::Number::from_f64(f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            RawValue::String(s) => JsonValue::String(s),
            RawValue::Array(items) => {
                JsonValue::Array(items.into_iter().map(Into::into).collect())
            }
            RawValue::Object(entries) => JsonValue::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}
