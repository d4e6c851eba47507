//! Per-scope symbol tables and control-flow merges
//!
//! One table per analysis scope maps a variable identity - a plain name or
//! an `instance::property` key - to its taint value. Absence means clean at
//! full certainty. Branch and loop boundaries reconcile tables through the
//! `union` and `augment` merges, which accumulate and decay certainty
//! instead of tracking boolean taint.

use std::collections::HashMap;

use crate::taint::TaintValue;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: HashMap<String, TaintValue>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Taint value bound to `name`. Unbound names are clean at full
    /// certainty; absence is the default state, not an error.
    pub fn get(&self, name: &str) -> TaintValue {
        self.entries
            .get(name)
            .copied()
            .unwrap_or_else(TaintValue::clean)
    }

    pub fn lookup(&self, name: &str) -> Option<TaintValue> {
        self.entries.get(name).copied()
    }

    pub fn set(&mut self, name: &str, value: TaintValue) {
        self.entries.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<TaintValue> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaintValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Merges two branch tables when neither branch's confidence is
    /// statically known. A key present in both keeps the first table's value
    /// with the certainties summed, clamped at 1; a key present in only one
    /// table is carried through unchanged.
    pub fn union(first: SymbolTable, second: SymbolTable) -> SymbolTable {
        let mut merged = first;
        for (name, value) in second.entries {
            match merged.entries.get_mut(&name) {
                Some(existing) => {
                    existing.certainty = (existing.certainty + value.certainty).min(1.0);
                }
                None => {
                    merged.entries.insert(name, value);
                }
            }
        }
        merged
    }

    /// Folds a branch's resulting table back into the table that preceded
    /// the branch. Keys the branch introduced join the outer table with
    /// certainty scaled by `confidence`; keys the branch dropped decay by
    /// the complement; any key left at exactly zero certainty is removed.
    pub fn augment(outer: SymbolTable, inner: &SymbolTable, confidence: f64) -> SymbolTable {
        let mut merged = outer;
        for (name, value) in &inner.entries {
            if !merged.entries.contains_key(name) {
                let mut scaled = *value;
                scaled.certainty *= confidence;
                merged.entries.insert(name.clone(), scaled);
            }
        }
        merged.entries.retain(|name, value| {
            if !inner.entries.contains_key(name) {
                value.certainty -= value.certainty * confidence;
            }
            value.certainty != 0.0
        });
        merged
    }
}
