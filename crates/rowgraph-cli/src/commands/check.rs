//! Check command - validate config and scan data files without migrating.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use rowgraph::{CheckReport, MigrationConfig, Migrator};

use super::{CountingDiagnostics, selected_entries};

pub fn run(
    config_path: PathBuf,
    entry: Option<String>,
    json_output: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let config = MigrationConfig::from_path(&config_path)?;
    let entries = selected_entries(&config, entry);

    let diagnostics = Arc::new(CountingDiagnostics::default());
    let migrator = Migrator::new(config).with_diagnostics(Arc::clone(&diagnostics));

    let reports = entries
        .iter()
        .map(|key| migrator.check_entry(key))
        .collect::<rowgraph::Result<Vec<CheckReport>>>()?;
    let clean = reports.iter().all(CheckReport::is_clean);

    if json_output {
        let status = serde_json::json!({
            "config": config_path.display().to_string(),
            "entries": reports,
            "quoting_warnings": diagnostics.warnings(),
            "quoting_errors": diagnostics.errors(),
            "is_clean": clean,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!(
            "{} {}",
            "Checked".cyan().bold(),
            config_path.display().to_string().white()
        );
        println!();

        for report in &reports {
            let marker = if report.is_clean() {
                "ok".green()
            } else {
                "malformed".red()
            };
            println!(
                "  {:<20} {:>8} rows  {} columns  {}",
                report.entry,
                report.rows_read,
                report.columns.len(),
                marker
            );
            for row in &report.malformed {
                println!(
                    "    line {}: {} tokens, expected at most {}",
                    row.line, row.tokens, row.expected
                );
            }
        }

        if diagnostics.warnings() > 0 || diagnostics.errors() > 0 {
            println!();
            println!(
                "  {} {} rows needed quoting recovery, {} could not be recovered",
                "Note:".yellow(),
                diagnostics.warnings(),
                diagnostics.errors()
            );
        }
    }

    Ok(if clean { 0 } else { 1 })
}
