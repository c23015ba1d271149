//! Logging setup using `tracing-subscriber`.
//!
//! `RUST_LOG` wins when set. Otherwise the level comes from the `-v` count:
//! warnings by default, then info, debug and trace.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Map the `-v` count to a level.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str().to_ascii_lowercase();
        EnvFilter::new(format!("rowgraph={level},rowgraph_cli={level}"))
    })
}

/// Install the global subscriber, writing to stderr.
pub fn init(verbosity: u8, json: bool) {
    let filter = build_env_filter(level_for(verbosity));

    // stdout carries statements, so logs always go to stderr.
    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbosity > 1)
                    .without_time(),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Warning: logging already initialised: {e}");
    }
}
