//! Advisory diagnostics for constructs the analysis cannot model
//!
//! Diagnostics never abort a run. They record where the analysis degraded,
//! such as an unsupported node kind or an exhausted call budget, alongside
//! the findings, so embedders can surface coverage gaps.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnsupportedConstruct,
    AliasCycle,
    CallDepthExceeded,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedConstruct => "unsupported_construct",
            DiagnosticKind::AliasCycle => "alias_cycle",
            DiagnosticKind::CallDepthExceeded => "call_depth_exceeded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, line: u32, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
