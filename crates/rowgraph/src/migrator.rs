//! File-level migration driver and public entry point.

use std::fs;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{Result, RowgraphError};
use crate::input::{HeaderIndex, Row};
use crate::schema::{DataConfigEntry, MigrationConfig, ProcessorConfig, ProcessorType};
use crate::statement::{InsertStatement, UnboundVariable};
use crate::transform::RowProcessor;

/// Statements produced from one data entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    /// Key of the data entry in the configuration.
    pub entry: String,
    /// One insert statement per row that produced at least one attribute.
    pub statements: Vec<InsertStatement>,
    /// Data rows read, excluding the header and blank lines.
    pub rows_read: usize,
    /// Rows that produced nothing to insert.
    pub rows_skipped: usize,
}

/// A row wider than the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRow {
    pub line: usize,
    pub tokens: usize,
    pub expected: usize,
}

/// Structural scan of one data entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub entry: String,
    pub columns: Vec<String>,
    pub rows_read: usize,
    pub malformed: Vec<MalformedRow>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

/// Migrates configured data files into insert statements.
pub struct Migrator {
    config: MigrationConfig,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Migrator {
    /// Create a migrator that reports data problems through `tracing`.
    pub fn new(config: MigrationConfig) -> Self {
        Self {
            config,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Route data diagnostics to a custom sink.
    pub fn with_diagnostics(mut self, diagnostics: impl Diagnostics + 'static) -> Self {
        self.diagnostics = Arc::new(diagnostics);
        self
    }

    /// Migrate every data entry in configuration order.
    pub fn migrate_all(&self) -> Result<Vec<MigrationResult>> {
        self.config
            .data
            .keys()
            .map(|key| self.migrate_entry(key))
            .collect()
    }

    /// Read an entry's data file and migrate it.
    pub fn migrate_entry(&self, key: &str) -> Result<MigrationResult> {
        let contents = self.read_entry(key)?;
        self.migrate_str(key, &contents)
    }

    /// Migrate in-memory file contents for an entry.
    ///
    /// The first line is the header. A row wider than the header aborts the
    /// whole entry with [`RowgraphError::MalformedRow`].
    pub fn migrate_str(&self, key: &str, contents: &str) -> Result<MigrationResult> {
        let entry = self.config.entry(key)?;
        let processor = self.config.processor_for(entry)?;
        let delimiter = entry.delimiter()?;
        let diagnostics = self.diagnostics.as_ref();

        tracing::info!(entry = key, processor = %processor.processor, "migrating entry");

        let mut lines = contents.lines().enumerate();
        let header = match lines.next() {
            Some((_, line)) => HeaderIndex::parse(line, delimiter, diagnostics),
            None => HeaderIndex::new(Vec::new()),
        };
        let row_processor = RowProcessor::new(&header, &processor.attributes, diagnostics);

        let mut result = MigrationResult {
            entry: key.to_string(),
            statements: Vec::new(),
            rows_read: 0,
            rows_skipped: 0,
        };

        for (index, raw) in lines {
            if raw.trim().is_empty() {
                continue;
            }
            let row = Row::parse(raw, index + 1, delimiter, diagnostics);
            row.ensure_width(header.len())?;
            result.rows_read += 1;

            match process_row(&row_processor, &row, entry, processor)? {
                Some(statement) => result.statements.push(statement),
                None => {
                    tracing::debug!(line = row.line, "row produced no attributes");
                    result.rows_skipped += 1;
                }
            }
        }

        tracing::info!(
            entry = key,
            rows = result.rows_read,
            statements = result.statements.len(),
            skipped = result.rows_skipped,
            "entry migrated"
        );
        Ok(result)
    }

    /// Scan an entry's data file for structural problems without aborting.
    pub fn check_entry(&self, key: &str) -> Result<CheckReport> {
        let contents = self.read_entry(key)?;
        self.check_str(key, &contents)
    }

    pub fn check_str(&self, key: &str, contents: &str) -> Result<CheckReport> {
        let entry = self.config.entry(key)?;
        let delimiter = entry.delimiter()?;
        let diagnostics = self.diagnostics.as_ref();

        let mut lines = contents.lines().enumerate();
        let header = match lines.next() {
            Some((_, line)) => HeaderIndex::parse(line, delimiter, diagnostics),
            None => HeaderIndex::new(Vec::new()),
        };

        let mut rows_read = 0;
        let mut malformed = Vec::new();
        for (index, raw) in lines {
            if raw.trim().is_empty() {
                continue;
            }
            rows_read += 1;
            let row = Row::parse(raw, index + 1, delimiter, diagnostics);
            if let Err(e) = row.ensure_width(header.len()) {
                tracing::warn!(line = row.line, "{e}");
                malformed.push(MalformedRow {
                    line: row.line,
                    tokens: row.tokens.len(),
                    expected: header.len(),
                });
            }
        }

        Ok(CheckReport {
            entry: key.to_string(),
            columns: header.columns,
            rows_read,
            malformed,
        })
    }

    fn read_entry(&self, key: &str) -> Result<String> {
        let entry = self.config.entry(key)?;
        let path = self.config.data_path(entry);
        fs::read_to_string(&path).map_err(|e| RowgraphError::Io { path, source: e })
    }
}

/// Build the insert statement for one row, if it carries any attribute.
fn process_row(
    row_processor: &RowProcessor<'_>,
    row: &Row,
    entry: &DataConfigEntry,
    processor: &ProcessorConfig,
) -> Result<Option<InsertStatement>> {
    match processor.processor_type {
        ProcessorType::Entity => {
            let mut statement = Some(UnboundVariable::named("e").isa(&processor.schema_type));
            for mapping in &entry.attributes {
                if let Some(current) = statement.take() {
                    statement = row_processor.add_attribute(row, current, mapping)?;
                }
            }
            Ok(statement
                .filter(|thing| !thing.attributes.is_empty())
                .map(InsertStatement::from))
        }
        ProcessorType::Attribute => {
            let Some(mapping) = entry.attributes.first() else {
                return Ok(None);
            };
            let attribute = row_processor.add_value(row, UnboundVariable::named("a"), mapping)?;
            Ok(attribute.map(|a| a.isa(&processor.schema_type).into()))
        }
    }
}
