//! The schema-conformant value tree produced by coercion.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// A value that has been coerced to a declared schema type.
///
/// Unlike [`RawValue`](crate::RawValue), a `TypedValue` carries schema
/// identity where it matters: enum values remember which enum they belong
/// to and objects remember their class name. Consumers that only want
/// plain data can flatten the tree with [`TypedValue::to_json`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "JsonValue")]
pub enum TypedValue {
    /// Null, either from an optional type or an unresolved partial field.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    String(String),
    /// A resolved enum constant.
    Enum {
        /// Name of the enum type this constant belongs to.
        enum_name: String,
        /// The canonical constant that was resolved.
        variant: String,
    },
    /// An array of typed items.
    Array(Vec<TypedValue>),
    /// An object with typed fields in declaration order.
    Object {
        /// Name of the object type.
        class_name: String,
        /// Field values keyed by canonical field name.
        fields: IndexMap<String, TypedValue>,
    },
}

impl TypedValue {
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

    /// The resolved constant, if this is an enum value.
    #[must_use]
    pub fn as_variant(&self) -> Option<&str> {
        match self {
            Self::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    /// The items, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[TypedValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field by canonical name, if this is an object.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&TypedValue> {
        match self {
            Self::Object { fields, .. } => fields.get(name),
            _ => None,
        }
    }

    /// Flatten to plain JSON: enums become their constant string and
    /// objects lose their class name.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        self.clone().into()
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<TypedValue> for JsonValue {
    fn from(value: TypedValue) -> Self {
        match value {
            TypedValue::Null => JsonValue::Null,
            TypedValue::Bool(b) => JsonValue::Bool(b),
            TypedValue::Int(i) => JsonValue::from(i),
            TypedValue::Float(f) => serde_json::Number::from_f64(f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            TypedValue::String(s) => JsonValue::String(s),
            TypedValue::Enum { variant, .. } => JsonValue::String(variant),
            TypedValue::Array(items) => {
                JsonValue::Array(items.into_iter().map(Into::into).collect())
            }
            TypedValue::Object { fields, .. } => JsonValue::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}
