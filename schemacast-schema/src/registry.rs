//! The sealed table of named schema types.

use indexmap::IndexMap;
use schemacast_core::{CoercionError, CoercionResult};

use crate::error::SchemaError;
use crate::types::SchemaType;

/// Append-only builder for a [`SchemaRegistry`].
///
/// Registration happens once, during compilation; `build` seals the
/// registry and no further mutation is possible.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    types: IndexMap<String, SchemaType>,
}

impl SchemaRegistryBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateType`] if the name is already
    /// registered; re-registration is a configuration error, not a
    /// replacement.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        ty: SchemaType,
    ) -> Result<&mut Self, SchemaError> {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(SchemaError::duplicate_type(name));
        }
        self.types.insert(name, ty);
        Ok(self)
    }

    /// Seal the registry.
    #[must_use]
    pub fn build(self) -> SchemaRegistry {
        tracing::debug!(types = self.types.len(), "sealed schema registry");
        SchemaRegistry { types: self.types }
    }
}

/// An immutable table of named schema types.
///
/// Sealed at build time; safe to share behind an `Arc` and read from any
/// number of threads without locking.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    types: IndexMap<String, SchemaType>,
}

impl SchemaRegistry {
    /// An empty registry, for targets that use no references.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve a type name.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError::UnknownType`] if the name is not
    /// registered. Callers treat this as fatal to the request: the
    /// compiled tables are incomplete.
    pub fn resolve(&self, name: &str) -> CoercionResult<&SchemaType> {
        self.types
            .get(name)
            .ok_or_else(|| CoercionError::unknown_type(name))
    }

    /// Whether a type name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumSchema, SchemaType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_and_resolve() {
        let mut builder = SchemaRegistryBuilder::new();
        builder
            .register("Answer", SchemaType::string())
            .unwrap()
            .register(
                "Sentiment",
                SchemaType::Enum(EnumSchema::new("Sentiment", ["Pos", "Neg"])),
            )
            .unwrap();

        let registry = builder.build();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("Answer").unwrap(), &SchemaType::string());
        assert!(registry.contains("Sentiment"));
    }

    #[test]
    fn test_duplicate_registration_is_an_error() {
        let mut builder = SchemaRegistryBuilder::new();
        builder.register("Answer", SchemaType::string()).unwrap();
        let err = builder
            .register("Answer", SchemaType::integer())
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateType { .. }));
    }

    #[test]
    fn test_unknown_type_is_a_coercion_error() {
        let registry = SchemaRegistry::empty();
        let err = registry.resolve("Ghost").unwrap_err();
        assert!(err.is_configuration_error());
    }
}
