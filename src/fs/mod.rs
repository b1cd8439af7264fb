//! Filesystem utilities backing the local artifact store.

pub mod atomic;

pub use atomic::atomic_write;

use std::fs;
use std::io;
use std::path::Path;

/// Copy a file, creating the destination's parent directories first.
pub fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map(|_| ())
}
