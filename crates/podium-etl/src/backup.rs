//! Rotate an existing database out of the way before a full reload.
//!
//! A run never merges into old data. The previous file is renamed to
//! `<file>.<YYYYmmddHHMMSS>.bak` next to the original and the pipeline starts
//! from an empty database.

use chrono::Local;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Move `db_path` aside if it exists.
///
/// Returns the backup path, or `None` when there was nothing to rotate.
pub fn rotate_database(db_path: &Path) -> io::Result<Option<PathBuf>> {
    if !db_path.exists() {
        return Ok(None);
    }

    let stamp = Local::now().format("%Y%m%d%H%M%S").to_string();
    let backup = unused_backup_path(db_path, &stamp);

    std::fs::rename(db_path, &backup)?;
    log::info!(
        "Rotated existing database {} to {}",
        db_path.display(),
        backup.display()
    );
    Ok(Some(backup))
}

fn backup_path(db_path: &Path, stamp: &str, attempt: u32) -> PathBuf {
    let mut name = OsString::from(db_path.as_os_str());
    name.push(".");
    name.push(stamp);
    if attempt > 0 {
        name.push(format!("-{attempt}"));
    }
    name.push(".bak");
    PathBuf::from(name)
}

// Two runs inside the same second must not clobber each other's backup.
fn unused_backup_path(db_path: &Path, stamp: &str) -> PathBuf {
    let mut attempt = 0;
    loop {
        let candidate = backup_path(db_path, stamp, attempt);
        if !candidate.exists() {
            return candidate;
        }
        attempt += 1;
    }
}
