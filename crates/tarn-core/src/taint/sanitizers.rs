//! Taint sanitizers registry for neutralizing routines
//!
//! Maps function names to the vulnerability category they defend against.
//! A sanitizer cancels exactly the taint that would be dangerous at its
//! category's sinks; taint of an incompatible category passes through
//! unchanged.

use std::collections::HashMap;

use super::value::SinkCategory;

#[derive(Debug, Clone)]
pub struct SanitizersRegistry {
    names: HashMap<String, SinkCategory>,
}

impl Default for SanitizersRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SanitizersRegistry {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_sql_sanitizers();
        registry.register_cmd_sanitizers();
        registry.register_xss_sanitizers();
        registry
    }

    fn register_sql_sanitizers(&mut self) {
        for name in ["escape_sql_string", "mysqli_real_escape_string"] {
            self.register(name, SinkCategory::Sql);
        }
    }

    fn register_cmd_sanitizers(&mut self) {
        for name in ["escapeshellcmd", "escapeshellarg"] {
            self.register(name, SinkCategory::Cmd);
        }
    }

    fn register_xss_sanitizers(&mut self) {
        for name in ["htmlspecialchars", "htmlentities"] {
            self.register(name, SinkCategory::Xss);
        }
    }

    pub fn register(&mut self, name: &str, category: SinkCategory) {
        self.names.insert(name.to_string(), category);
    }

    /// Sanitizing category of `name`, if registered.
    pub fn kind_of(&self, name: &str) -> Option<SinkCategory> {
        self.names.get(name).copied()
    }

    pub fn names_for_category(&self, category: SinkCategory) -> Vec<&str> {
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
