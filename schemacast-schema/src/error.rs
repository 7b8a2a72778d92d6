//! Errors raised while compiling or loading schema tables.

use thiserror::Error;

/// A schema construction or loading failure.
///
/// Unlike coercion failures these indicate broken configuration and are
/// surfaced to the caller immediately, before any coercion runs.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A type name was registered twice.
    #[error("type `{name}` is already registered")]
    DuplicateType {
        /// The name registered twice.
        name: String,
    },

    /// An inline enum or object inside a compiled document has no name.
    #[error("nested {kind} in type `{context}` must carry a `name`")]
    MissingTypeName {
        /// "enum" or "object".
        kind: &'static str,
        /// The top-level type the nested definition appears under.
        context: String,
    },

    /// An alias table refers to a type the document does not declare.
    #[error("alias table refers to unknown type `{type_name}`")]
    UnknownAliasType {
        /// The undeclared type name.
        type_name: String,
    },

    /// An alias maps to an identifier the target type does not declare.
    #[error("alias {alias:?} on `{type_name}` maps to unknown identifier `{target}`")]
    UnknownAliasTarget {
        /// The type the alias table is attached to.
        type_name: String,
        /// The observed-text alias key.
        alias: String,
        /// The canonical identifier that does not exist.
        target: String,
    },

    /// The compiled document is not valid JSON.
    #[error("malformed compiled schema document: {0}")]
    Document(#[from] serde_json::Error),
}

impl SchemaError {
    /// Create a [`SchemaError::DuplicateType`].
    pub fn duplicate_type(name: impl Into<String>) -> Self {
        Self::DuplicateType { name: name.into() }
    }
}
