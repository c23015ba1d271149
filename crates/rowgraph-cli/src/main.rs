//! Rowgraph CLI - migrate delimited data into graph insert statements.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Migrate {
            config,
            entry,
            output,
        } => commands::migrate::run(config, entry, output),

        Commands::Check {
            config,
            entry,
            json,
        } => commands::check::run(config, entry, json),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
