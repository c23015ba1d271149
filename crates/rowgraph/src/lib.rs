//! Rowgraph: turns rows of delimited text into graph insert statements.
//!
//! Each data row is tokenized, each mapped column is cleaned, optionally
//! rewritten by a preprocessor, coerced to its declared value type and
//! attached as an attribute to a statement.
//!
//! # Core Principles
//!
//! - **Rows never abort on bad values**: an invalid value is reported and skipped
//! - **Structural defects do**: a row wider than its header stops the migration
//! - **Diagnostics are injected**: route them to `tracing` or collect them
//!
//! # Example
//!
//! ```no_run
//! use rowgraph::{MigrationConfig, Migrator};
//!
//! let config = MigrationConfig::from_path("migration.json").unwrap();
//! let migrator = Migrator::new(config);
//! let result = migrator.migrate_entry("people").unwrap();
//!
//! for statement in &result.statements {
//!     println!("{statement}");
//! }
//! ```

pub mod diagnostics;
pub mod error;
pub mod input;
pub mod schema;
pub mod statement;
pub mod transform;

mod migrator;

pub use crate::migrator::{CheckReport, MalformedRow, MigrationResult, Migrator};
pub use diagnostics::{
    CollectingDiagnostics, Diagnostic, DiagnosticKind, Diagnostics, Severity, TracingDiagnostics,
};
pub use error::{Result, RowgraphError, ValueError};
pub use input::{HeaderIndex, Row};
pub use schema::{GeneratorMapping, MigrationConfig, ProcessorType, Value, ValueType};
pub use statement::{Attachable, InsertStatement, UnboundVariable};
pub use transform::RowProcessor;
