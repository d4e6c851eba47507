//! Taint value model and classification algebra
//!
//! A `TaintValue` pairs a classification kind with a certainty score in
//! `[0, 1]`. Kinds fall into three groups: clean, tainted by a source
//! category, and a confirmed vulnerability at a sink category. Vulnerability
//! values are terminal: they are reported where they are produced and do not
//! propagate as taint.

/// Where untrusted data can enter the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    /// Request parameters and other direct user input.
    Input,
    /// Data read back from storage, dangerous when echoed (persistent XSS).
    Database,
}

impl SourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCategory::Input => "input",
            SourceCategory::Database => "database",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            SourceCategory::Input => 1,
            SourceCategory::Database => 2,
        }
    }
}

/// Vulnerability classes; doubles as the category of sinks and sanitizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkCategory {
    Sql,
    Cmd,
    Xss,
}

impl SinkCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkCategory::Sql => "sql",
            SinkCategory::Cmd => "cmd",
            SinkCategory::Xss => "xss",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            SinkCategory::Sql => 1,
            SinkCategory::Cmd => 2,
            SinkCategory::Xss => 4,
        }
    }
}

/// Sink-compatibility rule: input-sourced data is dangerous at sql and cmd
/// sinks, database-sourced data at xss sinks. Everything else passes.
pub fn vulnerability_for(source: SourceCategory, sink: SinkCategory) -> Option<SinkCategory> {
    match (source, sink) {
        (SourceCategory::Input, SinkCategory::Sql) => Some(SinkCategory::Sql),
        (SourceCategory::Input, SinkCategory::Cmd) => Some(SinkCategory::Cmd),
        (SourceCategory::Database, SinkCategory::Xss) => Some(SinkCategory::Xss),
        _ => None,
    }
}

/// Whether a sanitizer of the given category neutralizes taint from the
/// given source. Shares the sink-compatibility rule: a sanitizer cancels
/// exactly the taint that would be dangerous at its category's sinks.
pub fn neutralizes(source: SourceCategory, sanitizer: SinkCategory) -> bool {
    vulnerability_for(source, sanitizer).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaintKind {
    Clean,
    Tainted(SourceCategory),
    Vulnerable(SinkCategory),
}

impl TaintKind {
    /// Integer code: 0 for clean, positive source codes, negated sink codes.
    pub fn code(&self) -> i32 {
        match self {
            TaintKind::Clean => 0,
            TaintKind::Tainted(source) => source.code(),
            TaintKind::Vulnerable(sink) => -sink.code(),
        }
    }
}

/// An immutable taint snapshot. Copied by value wherever it is stored, so no
/// two holders ever share one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaintValue {
    pub kind: TaintKind,
    /// Confidence in the classification, in `[0, 1]`. Degrades under
    /// uncertain control flow and lossy derivations.
    pub certainty: f64,
}

impl TaintValue {
    pub fn clean() -> Self {
        Self {
            kind: TaintKind::Clean,
            certainty: 1.0,
        }
    }

    pub fn tainted(source: SourceCategory, certainty: f64) -> Self {
        Self {
            kind: TaintKind::Tainted(source),
            certainty,
        }
    }

    pub fn vulnerable(sink: SinkCategory, certainty: f64) -> Self {
        Self {
            kind: TaintKind::Vulnerable(sink),
            certainty,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.kind == TaintKind::Clean
    }

    pub fn is_tainted(&self) -> bool {
        matches!(self.kind, TaintKind::Tainted(_))
    }

    pub fn is_vulnerability(&self) -> bool {
        matches!(self.kind, TaintKind::Vulnerable(_))
    }

    /// Halves the certainty, keeping the kind. Models the information loss
    /// of an array element access.
    pub fn halved(self) -> Self {
        Self {
            kind: self.kind,
            certainty: self.certainty / 2.0,
        }
    }

    /// Combination rule for binary operands: the first non-clean operand
    /// wins, left to right, carrying its certainty through unchanged. Two
    /// clean operands produce a clean result at full certainty.
    pub fn combine(left: Self, right: Self) -> Self {
        if !left.is_clean() {
            left
        } else if !right.is_clean() {
            right
        } else {
            Self::clean()
        }
    }

    /// Classifies this value against a sink. A compatible tainted value
    /// becomes a vulnerability at the sink's category; any other value comes
    /// back clean. Certainty carries over from this value either way, so a
    /// caller can distinguish "no vulnerability of this type" from a fresh
    /// clean value.
    pub fn classify_at_sink(self, sink: SinkCategory) -> Self {
        match self.kind {
            TaintKind::Tainted(source) => match vulnerability_for(source, sink) {
                Some(category) => Self::vulnerable(category, self.certainty),
                None => Self {
                    kind: TaintKind::Clean,
                    certainty: self.certainty,
                },
            },
            _ => Self {
                kind: TaintKind::Clean,
                certainty: self.certainty,
            },
        }
    }
}

impl Default for TaintValue {
    fn default() -> Self {
        Self::clean()
    }
}
