//! Taint sources registry for untrusted data entry points
//!
//! Maps bare identifiers - superglobal names and function names - to the
//! source category they introduce. Reads of `_GET`-style superglobals and
//! calls such as `file_get_contents` bring tainted data into the program.

use std::collections::HashMap;

use super::value::SourceCategory;

#[derive(Debug, Clone)]
pub struct SourcesRegistry {
    names: HashMap<String, SourceCategory>,
}

impl Default for SourcesRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SourcesRegistry {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_input_sources();
        registry.register_database_sources();
        registry
    }

    fn register_input_sources(&mut self) {
        for name in ["_GET", "_POST", "_COOKIE", "_ENV"] {
            self.register(name, SourceCategory::Input);
        }
    }

    fn register_database_sources(&mut self) {
        for name in ["file_get_contents", "mysql_fetch_row"] {
            self.register(name, SourceCategory::Database);
        }
    }

    pub fn register(&mut self, name: &str, category: SourceCategory) {
        self.names.insert(name.to_string(), category);
    }

    /// Source category of `name`, if registered.
    pub fn kind_of(&self, name: &str) -> Option<SourceCategory> {
        self.names.get(name).copied()
    }

    pub fn names_for_category(&self, category: SourceCategory) -> Vec<&str> {
        self.names
            .iter()
            .filter(|(_, c)| **c == category)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SourcesRegistry {
        SourcesRegistry::with_defaults()
    }

    #[test]
    fn new_registry_is_empty() {
        assert!(SourcesRegistry::new().is_empty());
    }

    #[test]
    fn superglobals_are_input_sources() {
        let registry = registry();
        for name in ["_GET", "_POST", "_COOKIE", "_ENV"] {
            assert_eq!(registry.kind_of(name), Some(SourceCategory::Input));
        }
    }

    #[test]
    fn database_reads_are_database_sources() {
        let registry = registry();
        assert_eq!(
            registry.kind_of("file_get_contents"),
            Some(SourceCategory::Database)
        );
        assert_eq!(
            registry.kind_of("mysql_fetch_row"),
            Some(SourceCategory::Database)
        );
    }

    #[test]
    fn unregistered_name_is_not_a_source() {
        assert_eq!(registry().kind_of("strlen"), None);
    }

    #[test]
    fn custom_source_registration() {
        let mut registry = registry();
        registry.register("_REQUEST", SourceCategory::Input);
        assert_eq!(registry.kind_of("_REQUEST"), Some(SourceCategory::Input));
    }

    #[test]
    fn names_for_category_filters() {
        let registry = registry();
        let input = registry.names_for_category(SourceCategory::Input);
        assert!(input.contains(&"_GET"));
        assert!(!input.contains(&"file_get_contents"));
    }
}
