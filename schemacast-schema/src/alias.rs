//! Alias tables: observed textual variants mapped to canonical identifiers.
//!
//! Models echo enum constants as full descriptive labels and rename object
//! keys freely. Alias tables translate those observed strings back to the
//! canonical constants and field names the schema declares. Tables are
//! built once alongside the schema and read-only afterwards; they are side
//! data, never a mutation of the type itself.

use indexmap::IndexMap;
use std::collections::HashMap;

/// Aliases for a single enum or object type.
///
/// Many observed strings may map to one canonical identifier. Registering
/// the same alias twice keeps the key's original scan position but the
/// later mapping wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    entries: IndexMap<String, String>,
}

impl AliasTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observed string as an alias for a canonical identifier.
    pub fn insert(&mut self, alias: impl Into<String>, canonical: impl Into<String>) -> &mut Self {
        self.entries.insert(alias.into(), canonical.into());
        self
    }

    /// Exact-match lookup of an observed string.
    #[must_use]
    pub fn lookup_exact(&self, observed: &str) -> Option<&str> {
        self.entries.get(observed).map(String::as_str)
    }

    /// Containment lookup: the first registered alias key that appears
    /// inside the observed string wins.
    ///
    /// This supports the common pattern where a model echoes a whole
    /// descriptive label ("k1: User is angry, proceed with care") that
    /// contains a registered alias.
    #[must_use]
    pub fn lookup_contains(&self, observed: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(alias, _)| observed.contains(alias.as_str()))
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Alias keys that map to the given canonical identifier, in
    /// registration order.
    pub fn aliases_for<'a>(&'a self, canonical: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(_, target)| target.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
    }

    /// All entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(alias, canonical)| (alias.as_str(), canonical.as_str()))
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Alias tables keyed by type name.
///
/// Absence of a table for a type means exact-match only for that type.
#[derive(Debug, Clone, Default)]
pub struct AliasMap {
    tables: HashMap<String, AliasTable>,
}

impl AliasMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one alias on a type, creating the table if needed.
    pub fn add_alias(
        &mut self,
        type_name: impl Into<String>,
        alias: impl Into<String>,
        canonical: impl Into<String>,
    ) -> &mut Self {
        self.tables
            .entry(type_name.into())
            .or_default()
            .insert(alias, canonical);
        self
    }

    /// Attach a whole table to a type, replacing any existing one.
    pub fn insert_table(&mut self, type_name: impl Into<String>, table: AliasTable) -> &mut Self {
        self.tables.insert(type_name.into(), table);
        self
    }

    /// The table for a type, if one was registered.
    #[must_use]
    pub fn table(&self, type_name: &str) -> Option<&AliasTable> {
        self.tables.get(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exact_lookup() {
        let mut table = AliasTable::new();
        table.insert("REASONING", "prop1").insert("ANSWER", "prop2");

        assert_eq!(table.lookup_exact("REASONING"), Some("prop1"));
        assert_eq!(table.lookup_exact("reasoning"), None);
    }

    #[test]
    fn test_contains_lookup_prefers_first_registered() {
        let mut table = AliasTable::new();
        table.insert("angry", "A").insert("user is angry", "B");

        // Both keys appear in the observed text; the earlier registration
        // wins.
        assert_eq!(table.lookup_contains("the user is angry today"), Some("A"));
    }

    #[test]
    fn test_duplicate_alias_last_registration_wins() {
        let mut table = AliasTable::new();
        table.insert("k1", "A").insert("other", "B").insert("k1", "C");

        assert_eq!(table.lookup_exact("k1"), Some("C"));
        // The key keeps its original position in scan order.
        let first = table.entries().next().unwrap();
        assert_eq!(first, ("k1", "C"));
    }

    #[test]
    fn test_aliases_for_collects_many_to_one() {
        let mut table = AliasTable::new();
        table
            .insert("k1: User is angry", "A")
            .insert("k1", "A")
            .insert("k2", "B");

        let for_a: Vec<&str> = table.aliases_for("A").collect();
        assert_eq!(for_a, ["k1: User is angry", "k1"]);
    }

    #[test]
    fn test_missing_table_means_exact_only() {
        let map = AliasMap::new();
        assert!(map.table("Sentiment").is_none());
    }
}
