use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use noneprompt::cli::{self, Cli};
use noneprompt::config::{self, Config};
use noneprompt::logging;

/// Set up file logging when `NONEPROMPT_LOG` holds a filter directive
fn init_logging() -> Result<Option<logging::LoggingGuard>> {
    let Some(filter) = std::env::var(logging::LOG_ENV).ok().filter(|f| !f.is_empty()) else {
        return Ok(None);
    };

    // Ensure config directory exists (creates logs dir too)
    config::ensure_directories()?;

    let (log_file_info, guard) = logging::init_file_logging(&config::logs_dir(), &filter)?;

    // Clean up old logs (7-day retention)
    if let Ok(count) = logging::cleanup_old_logs(&config::logs_dir()) {
        if count > 0 {
            tracing::info!("Cleaned up {} old log files", count);
        }
    }

    tracing::info!("Logging to: {}", log_file_info.path.display());
    Ok(Some(guard))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = init_logging().and_then(|guard| {
        let config = Config::load()?;
        let outcome = cli::run(&cli, &config);
        drop(guard);
        outcome
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
