//! Age-based removal of old log files

use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::Result;

use super::file_writer::LOG_FILE_PREFIX;

/// Default retention period in days
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

/// Remove noneprompt log files older than [`DEFAULT_RETENTION_DAYS`]
///
/// Returns how many files were removed.
pub fn cleanup_old_logs(logs_dir: &Path) -> Result<usize> {
    cleanup_old_logs_with_retention(logs_dir, DEFAULT_RETENTION_DAYS)
}

/// Remove noneprompt log files last written more than `retention_days` ago
///
/// Files from other programs sharing the directory are left alone, and a
/// missing directory counts as empty.
pub fn cleanup_old_logs_with_retention(logs_dir: &Path, retention_days: u64) -> Result<usize> {
    if !logs_dir.is_dir() {
        return Ok(0);
    }

    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(retention_days * SECS_PER_DAY))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut stale = Vec::new();
    for entry in fs::read_dir(logs_dir)? {
        let entry = entry?;
        if !is_own_log(&entry.file_name()) {
            continue;
        }
        let written = entry.metadata().and_then(|m| m.modified());
        if matches!(written, Ok(at) if at < cutoff) {
            stale.push(entry.path());
        }
    }

    let removed = stale
        .iter()
        .filter(|path| match fs::remove_file(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to remove old log: {}", e);
                false
            }
        })
        .count();
    if removed > 0 {
        tracing::debug!(removed, "Removed old log files");
    }
    Ok(removed)
}

const SECS_PER_DAY: u64 = 24 * 60 * 60;

fn is_own_log(name: &OsStr) -> bool {
    name.to_str()
        .is_some_and(|name| name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log"))
}
