//! Taint sinks registry for dangerous operations
//!
//! Maps function names - and `receiver::method` composite keys for method
//! calls - to the vulnerability category a tainted argument triggers there:
//! query execution for SQL injection, shell execution for command injection,
//! output routines for persistent XSS.

use std::collections::HashMap;

use super::value::SinkCategory;

#[derive(Debug, Clone)]
pub struct SinksRegistry {
    names: HashMap<String, SinkCategory>,
}

impl Default for SinksRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SinksRegistry {
    pub fn new() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_sql_sinks();
        registry.register_cmd_sinks();
        registry.register_xss_sinks();
        registry
    }

    fn register_sql_sinks(&mut self) {
        for name in ["pg_query", "mysql_query", "mysqli_query", "mysqli::query"] {
            self.register(name, SinkCategory::Sql);
        }
    }

    fn register_cmd_sinks(&mut self) {
        for name in ["system", "exec", "shell_exec", "passthru"] {
            self.register(name, SinkCategory::Cmd);
        }
    }

    fn register_xss_sinks(&mut self) {
        for name in ["print_", "echo", "print"] {
            self.register(name, SinkCategory::Xss);
        }
    }

    pub fn register(&mut self, name: &str, category: SinkCategory) {
        self.names.insert(name.to_string(), category);
    }

    /// Sink category of `name`, if registered.
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
