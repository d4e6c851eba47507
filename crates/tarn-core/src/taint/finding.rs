//! Vulnerability findings
//!
//! A finding is the analyzer's externally visible verdict: the vulnerability
//! category, the source line it was confirmed on, and the certainty rendered
//! as a rounded percentage.

use std::fmt;

use serde::Serialize;

use super::value::SinkCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    Sql,
    Cmd,
    Xss,
    /// Vulnerability codes outside the known sink categories.
    Other,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::Sql => "sql",
            FindingCategory::Cmd => "cmd",
            FindingCategory::Xss => "xss",
            FindingCategory::Other => "other",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            FindingCategory::Sql => "SQL injection",
            FindingCategory::Cmd => "Command line injection",
            FindingCategory::Xss => "Persistent XSS",
            FindingCategory::Other => "Other type of",
        }
    }
}

impl From<SinkCategory> for FindingCategory {
    fn from(category: SinkCategory) -> Self {
        match category {
            SinkCategory::Sql => FindingCategory::Sql,
            SinkCategory::Cmd => FindingCategory::Cmd,
            SinkCategory::Xss => FindingCategory::Xss,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub line: u32,
    /// Rounded percentage in `0..=100`.
    pub certainty: u8,
}

impl Finding {
    /// Builds a finding from a certainty fraction in `[0, 1]`.
    pub fn new(category: FindingCategory, line: u32, certainty: f64) -> Self {
        Self {
            category,
            line,
            certainty: (certainty * 100.0).round() as u8,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vulnerability found in line {}, certainty: {}%",
            self.category.describe(),
            self.line,
            self.certainty
        )
    }
}
