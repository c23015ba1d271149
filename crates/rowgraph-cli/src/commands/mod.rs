//! CLI command implementations.

pub mod check;
pub mod migrate;

use std::sync::atomic::{AtomicUsize, Ordering};

use rowgraph::{Diagnostic, Diagnostics, Severity, TracingDiagnostics};

/// Forwards diagnostics to `tracing` and counts them for the summary.
#[derive(Default)]
pub struct CountingDiagnostics {
    inner: TracingDiagnostics,
    warnings: AtomicUsize,
    errors: AtomicUsize,
}

impl CountingDiagnostics {
    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Diagnostics for CountingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        let counter = match diagnostic.severity {
            Severity::Warning => &self.warnings,
            Severity::Error => &self.errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.inner.report(diagnostic);
    }
}

/// Entries to process: the one requested, or all in config order.
pub fn selected_entries(config: &rowgraph::MigrationConfig, entry: Option<String>) -> Vec<String> {
    match entry {
        Some(entry) => vec![entry],
        None => config.data.keys().cloned().collect(),
    }
}
