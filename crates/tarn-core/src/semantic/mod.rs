//! Scope-level bookkeeping for the taint engine
//!
//! Symbol tables hold the per-scope taint bindings; alias chains resolve
//! reference aliases and object handles to their canonical names.

pub mod aliases;
pub mod symbols;

pub use aliases::{AliasChain, AliasCycle};
pub use symbols::SymbolTable;
