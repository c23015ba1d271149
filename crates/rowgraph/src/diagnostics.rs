//! Diagnostic sink for recoverable data problems.
//!
//! The transformation engine never logs through a global. Every function
//! that can skip a value or a row takes a `&dyn Diagnostics` and reports
//! what it skipped, so callers decide where the reports go: the tracing
//! subscriber in production, an in-memory collector in tests.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A value or column was skipped; the row continues.
    Warning,
    /// The row could not be read at all.
    Error,
}

/// What kind of problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Row broke RFC 4180 quoting and was re-read with escaped quotes.
    QuotingRecovered,
    /// Row could not be read even after escaping quotes.
    QuotingUnrecoverable,
    /// A mapped column does not exist in the header.
    MissingColumn,
    /// A token could not be coerced to its declared value type.
    InvalidValue,
}

impl DiagnosticKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::QuotingRecovered => "quoting_recovered",
            DiagnosticKind::QuotingUnrecoverable => "quoting_unrecoverable",
            DiagnosticKind::MissingColumn => "missing_column",
            DiagnosticKind::InvalidValue => "invalid_value",
        }
    }
}

/// A single diagnostic report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    /// Source line the problem was found on, when known.
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            line: None,
            message: message.into(),
        }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            line: None,
            message: message.into(),
        }
    }

    /// Attach the source line number.
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Receiver of diagnostic reports. Must tolerate concurrent callers.
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        let kind = diagnostic.kind.label();
        match diagnostic.severity {
            Severity::Warning => tracing::warn!(
                target: "rowgraph::data",
                line = ?diagnostic.line,
                kind,
                "{}",
                diagnostic.message
            ),
            Severity::Error => tracing::error!(
                target: "rowgraph::data",
                line = ?diagnostic.line,
                kind,
                "{}",
                diagnostic.message
            ),
        }
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    reports: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    /// Number of reports with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.reports
            .lock()
            .map(|reports| reports.iter().filter(|d| d.severity == severity).count())
            .unwrap_or(0)
    }

    /// Number of reports of the given kind.
    pub fn count_kind(&self, kind: DiagnosticKind) -> usize {
        self.reports
            .lock()
            .map(|reports| reports.iter().filter(|d| d.kind == kind).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.reports
            .lock()
            .map(|reports| reports.is_empty())
            .unwrap_or(true)
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(diagnostic);
        }
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for std::sync::Arc<D> {
    fn report(&self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}
