//! Atomic file writes for artifact storage.
//!
//! Every write goes to a temporary file in the target's directory, is synced
//! to disk, and is then renamed over the target. Readers polling the same
//! directory from another job never observe a half-written lock document or
//! manifest.
//!
//! The temporary name includes the process id, so two jobs sharing a store
//! directory never write through the same temporary file. `std::fs::rename`
//! replaces an existing target on both POSIX and Windows.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path)?;
    if let Err(e) = write_and_sync(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    // Persist the directory entry as well; failure here is not fatal.
    if let Some(parent) = path.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

/// Build `.{filename}.{pid}.tmp` next to the target.
fn temp_path_for(target: &Path) -> io::Result<PathBuf> {
    let filename = target.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid file path '{}'", target.display()),
        )
    })?;
    let parent = target.parent().unwrap_or(Path::new("."));
    Ok(parent.join(format!(".{}.{}.tmp", filename, std::process::id())))
}

fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}
