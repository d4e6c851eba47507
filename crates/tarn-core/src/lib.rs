//! Core analysis engine for the Tarn static analyzer
//!
//! Tarn performs whole-program taint analysis over an already-parsed PHP
//! program tree: values derived from untrusted sources are tracked through
//! the program until they reach a dangerous sink, with sanitizing calls
//! neutralizing specific vulnerability classes along the way. Findings carry
//! the vulnerability category, the source line, and a heuristic certainty
//! percentage.
//!
//! Parsing and process concerns belong to the embedder; the [`ast::Program`]
//! builder is the integration surface a front end targets, and
//! [`taint::TaintAnalyzer`] is the entry point.

pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod semantic;
pub mod taint;

pub use ast::{ExprId, ExprKind, ExprNode, Program, StmtId, StmtKind, StmtNode};
pub use config::{Config, ConfigError};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use taint::{
    AnalysisOptions, AnalysisReport, Finding, FindingCategory, SinkCategory, SourceCategory,
    TaintAnalyzer, TaintKind, TaintValue,
};
