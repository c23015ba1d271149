//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rowgraph: migrate delimited data files into graph insert statements
#[derive(Parser)]
#[command(name = "rowgraph")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Migrate data files into insert statements
    Migrate {
        /// Path to the migration config (JSON)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Only migrate this data entry (default: all entries)
        #[arg(short, long)]
        entry: Option<String>,

        /// Write statements to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate the config and scan data files for malformed rows
    Check {
        /// Path to the migration config (JSON)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Only check this data entry (default: all entries)
        #[arg(short, long)]
        entry: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::parse_from(["rowgraph", "-vv", "check", "migration.json", "--json"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Check { json: true, .. }));
    }
}
