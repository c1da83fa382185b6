//! Opt-in file logging for noneprompt
//!
//! The prompt owns the terminal, so log output never goes to stdout or stderr.
//! When enabled, events are written to a timestamped file under
//! `~/.noneprompt/logs/` and old files are pruned.

mod file_writer;
mod retention;

pub use file_writer::{init_file_logging, LogFileInfo, LoggingGuard};
pub use retention::{cleanup_old_logs, cleanup_old_logs_with_retention, DEFAULT_RETENTION_DAYS};

/// Environment variable holding the `EnvFilter` directive that enables logging
pub const LOG_ENV: &str = "NONEPROMPT_LOG";
