//! The sealed tables a coercion session reads.

use std::sync::Arc;

use schemacast_schema::{load_document, AliasMap, SchemaError, SchemaRegistry};

/// The read-only environment shared by all coercion calls of a session.
///
/// Holds the sealed schema registry and alias tables behind `Arc`s:
/// cloning is cheap and any number of threads may coerce against the same
/// environment concurrently without locking.
#[derive(Debug, Clone, Default)]
pub struct CoercionEnv {
    registry: Arc<SchemaRegistry>,
    aliases: Arc<AliasMap>,
}

impl CoercionEnv {
    /// Seal a registry and alias map into an environment.
    #[must_use]
    pub fn new(registry: SchemaRegistry, aliases: AliasMap) -> Self {
        Self {
            registry: Arc::new(registry),
            aliases: Arc::new(aliases),
        }
    }

    /// Build an environment from a compiled schema document.
    ///
    /// # Errors
    ///
    /// Any malformed-schema condition in the document is returned
    /// immediately; see [`load_document`].
    pub fn from_document(text: &str) -> Result<Self, SchemaError> {
        let (registry, aliases) = load_document(text)?;
        Ok(Self::new(registry, aliases))
    }

    /// The schema registry.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The alias tables.
    #[must_use]
    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }
}
