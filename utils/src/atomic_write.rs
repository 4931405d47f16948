//! Whole-file replacement that never leaves a half-written file behind.
//!
//! Bytes go to a temp file in the target's directory, are synced, then renamed
//! over the target. Where rename-over-existing is refused (Windows), the old
//! file is moved to `<name>.bak` first and restored if the second rename fails.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("bak")
}

/// Put back a `.bak` stranded by a crash between the two renames.
///
/// Only acts when the target is missing, so a healthy file always wins.
pub fn recover_bak_file(path: &Path) {
    let backup = backup_path(path);
    if path.exists() || !backup.exists() {
        return;
    }
    match fs::rename(&backup, path) {
        Ok(()) => tracing::warn!(path = %path.display(), "Restored file from interrupted write"),
        Err(e) => tracing::warn!(path = %path.display(), "Failed to restore .bak file: {e}"),
    }
}

/// Replace `path` with `bytes`, creating parent directories as needed.
pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    let Err(first) = tmp.persist(path) else {
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "File replaced");
        return Ok(());
    };
    if !path.exists() {
        return Err(first.error);
    }

    let backup = backup_path(path);
    let _ = fs::remove_file(&backup);
    fs::rename(path, &backup)?;
    if let Err(second) = first.file.persist(path) {
        let _ = fs::rename(&backup, path);
        return Err(second.error);
    }
    if let Err(e) = fs::remove_file(&backup) {
        tracing::warn!(path = %backup.display(), "Failed to remove .bak after write: {e}");
    }
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "File replaced via backup");
    Ok(())
}
