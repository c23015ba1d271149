//! Migrate command - write insert statements for configured data files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use rowgraph::{MigrationConfig, Migrator};

use super::{CountingDiagnostics, selected_entries};

pub fn run(
    config_path: PathBuf,
    entry: Option<String>,
    output: Option<PathBuf>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let config = MigrationConfig::from_path(&config_path)?;
    let entries = selected_entries(&config, entry);

    let diagnostics = Arc::new(CountingDiagnostics::default());
    let migrator = Migrator::new(config).with_diagnostics(Arc::clone(&diagnostics));

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut total_statements = 0;
    let mut total_skipped = 0;

    for key in &entries {
        let result = migrator.migrate_entry(key)?;
        for statement in &result.statements {
            writeln!(writer, "{statement}")?;
        }

        eprintln!(
            "{} {}: {} rows, {} statements, {} skipped",
            "Migrated".green().bold(),
            key.white(),
            result.rows_read,
            result.statements.len(),
            result.rows_skipped
        );
        total_statements += result.statements.len();
        total_skipped += result.rows_skipped;
    }
    writer.flush()?;

    eprintln!();
    eprintln!(
        "{} {} statements from {} entries ({} rows skipped)",
        "Done:".cyan().bold(),
        total_statements,
        entries.len(),
        total_skipped
    );

    let (warnings, errors) = (diagnostics.warnings(), diagnostics.errors());
    if warnings > 0 || errors > 0 {
        eprintln!(
            "  {} {}  {} {}",
            "Warnings:".yellow(),
            warnings,
            "Errors:".red(),
            errors
        );
    }
    if let Some(path) = output {
        eprintln!("  Output: {}", path.display());
    }

    Ok(0)
}
