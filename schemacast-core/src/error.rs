//! Error types for coercion.

use thiserror::Error;

use crate::path::ValuePath;
use crate::raw::RawValue;

/// A coercion failure, localized to a path in the value tree.
///
/// Coercion failures are returned as values, never raised: a failed call
/// leaves no state behind and the caller decides what to do with the
/// diagnostic. Only [`CoercionError::UnknownType`] indicates a
/// configuration problem rather than bad model output.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoercionError {
    /// The extractor found nothing structured and the target is not
    /// optional.
    #[error("no structured payload found in model output")]
    NoPayloadFound,

    /// The raw value has the wrong shape for the target type.
    #[error("expected {expected} at {path}, got {found}")]
    TypeMismatch {
        /// Where in the value tree the mismatch occurred.
        path: ValuePath,
        /// Human-readable description of the expected type.
        expected: String,
        /// Bounded preview of the offending raw fragment.
        found: String,
    },

    /// A raw string matched neither a constant nor an alias of the enum.
    #[error("value {fragment:?} at {path} matches no constant of enum {enum_name}")]
    EnumMismatch {
        /// Where in the value tree the mismatch occurred.
        path: ValuePath,
        /// The enum being coerced to.
        enum_name: String,
        /// Bounded preview of the offending raw fragment.
        fragment: String,
    },

    /// A required object field was absent with no default.
    #[error("missing required field `{field}` at {path}")]
    MissingField {
        /// Path of the enclosing object.
        path: ValuePath,
        /// The canonical field name that was not found.
        field: String,
    },

    /// A schema reference named a type the registry does not hold.
    ///
    /// This is a configuration error: the compiled tables are incomplete.
    #[error("unknown type `{name}` referenced by schema")]
    UnknownType {
        /// The unresolved type name.
        name: String,
    },

    /// The recursion guard tripped while descending the schema.
    #[error("recursion limit exceeded at {path}")]
    RecursionLimitExceeded {
        /// Where in the value tree the guard tripped.
        path: ValuePath,
    },
}

impl CoercionError {
    /// Create a [`CoercionError::TypeMismatch`] from the offending raw
    /// value.
    pub fn type_mismatch(path: ValuePath, expected: impl Into<String>, found: &RawValue) -> Self {
        Self::TypeMismatch {
            path,
            expected: expected.into(),
            found: format!("{} ({})", found.fragment(), found.type_name()),
        }
    }

    /// Create a [`CoercionError::EnumMismatch`].
    pub fn enum_mismatch(
        path: ValuePath,
        enum_name: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Self {
        Self::EnumMismatch {
            path,
            enum_name: enum_name.into(),
            fragment: fragment.into(),
        }
    }

    /// Create a [`CoercionError::MissingField`].
    pub fn missing_field(path: ValuePath, field: impl Into<String>) -> Self {
        Self::MissingField {
            path,
            field: field.into(),
        }
    }

    /// Create a [`CoercionError::UnknownType`].
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    /// Whether this failure indicates broken configuration rather than
    /// unusable model output.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::UnknownType { .. })
    }
}

/// Result type for coercion calls.
pub type CoercionResult<T> = Result<T, CoercionError>;
