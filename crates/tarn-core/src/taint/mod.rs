//! Taint analysis for PHP programs
//!
//! Tracks how values derived from untrusted sources flow through
//! assignments, expressions, and calls into dangerous sinks, accounting for
//! sanitizing calls that neutralize specific vulnerability classes.

pub mod finding;
pub mod propagation;
pub mod sanitizers;
pub mod sinks;
pub mod sources;
pub mod value;

pub use finding::{Finding, FindingCategory};
pub use propagation::{AnalysisReport, TaintInterpreter};
pub use sanitizers::SanitizersRegistry;
pub use sinks::SinksRegistry;
pub use sources::SourcesRegistry;
pub use value::{SinkCategory, SourceCategory, TaintKind, TaintValue};

use crate::ast::Program;
use crate::config::{self, Config};

/// Tunable limits for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Interprocedural inlining budget. Calls nested deeper than this are
    /// treated as opaque and clean, with a diagnostic.
    pub max_call_depth: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_call_depth: config::DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

#[derive(Debug)]
pub struct TaintAnalyzer {
    sources: SourcesRegistry,
    sinks: SinksRegistry,
    sanitizers: SanitizersRegistry,
    options: AnalysisOptions,
}

impl Default for TaintAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TaintAnalyzer {
    pub fn new() -> Self {
        Self {
            sources: SourcesRegistry::with_defaults(),
            sinks: SinksRegistry::with_defaults(),
            sanitizers: SanitizersRegistry::with_defaults(),
            options: AnalysisOptions::default(),
        }
    }

    pub fn with_registries(
        sources: SourcesRegistry,
        sinks: SinksRegistry,
        sanitizers: SanitizersRegistry,
    ) -> Self {
        Self {
            sources,
            sinks,
            sanitizers,
            options: AnalysisOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Built-in defaults extended with the entries of a loaded config.
    pub fn from_config(config: &Config) -> Self {
        let mut analyzer = Self::new();
        for name in &config.sources.input {
            analyzer.sources.register(name, SourceCategory::Input);
        }
        for name in &config.sources.database {
            analyzer.sources.register(name, SourceCategory::Database);
        }
        for name in &config.sinks.sql {
            analyzer.sinks.register(name, SinkCategory::Sql);
        }
        for name in &config.sinks.cmd {
            analyzer.sinks.register(name, SinkCategory::Cmd);
        }
        for name in &config.sinks.xss {
            analyzer.sinks.register(name, SinkCategory::Xss);
        }
        for name in &config.sanitizers.sql {
            analyzer.sanitizers.register(name, SinkCategory::Sql);
        }
        for name in &config.sanitizers.cmd {
            analyzer.sanitizers.register(name, SinkCategory::Cmd);
        }
        for name in &config.sanitizers.xss {
            analyzer.sanitizers.register(name, SinkCategory::Xss);
        }
        analyzer.options.max_call_depth = config.analysis.max_call_depth;
        analyzer
    }

    /// Runs one analysis over the program's top-level statement sequence.
    pub fn analyze(&self, program: &Program) -> AnalysisReport {
        let mut interpreter = TaintInterpreter::new(
            program,
            &self.sources,
            &self.sinks,
            &self.sanitizers,
            self.options,
        );
        interpreter.run_program();
        interpreter.into_report()
    }

    pub fn sources_registry(&self) -> &SourcesRegistry {
        &self.sources
    }

    pub fn sinks_registry(&self) -> &SinksRegistry {
        &self.sinks
    }

    pub fn sanitizers_registry(&self) -> &SanitizersRegistry {
        &self.sanitizers
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }
}
