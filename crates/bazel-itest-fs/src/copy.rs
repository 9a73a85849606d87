//! Byte-exact file and directory-tree copies.
//!
//! Symlinks are followed via `fs::metadata`, so links in the source land as
//! regular files in the destination. Destination directories are created
//! lazily, only when a file needs them; empty source directories are not
//! reproduced.

use std::fs;
use std::path::Path;

use crate::{ensure_dir, io_err, FsError, Result};

/// Copy a single file to `dest`, creating missing parent directories first.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(src, dest).map_err(|source| FsError::Copy {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    })?;
    tracing::debug!("copying {} -> {}", src.display(), dest.display());
    Ok(())
}

/// Recursively copy every file under `from` into `to`, preserving relative
/// structure. Returns the number of files copied.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    let entries = fs::read_dir(from).map_err(io_err("read directory", from))?;
    for entry in entries {
        let entry = entry.map_err(io_err("read directory", from))?;
        let name = entry.file_name();
        let src = from.join(&name);
        let dest = to.join(&name);
        let meta = fs::metadata(&src).map_err(io_err("stat", &src))?;
        if meta.is_file() {
            copy_file(&src, &dest)?;
            copied += 1;
        } else if meta.is_dir() {
            copied += copy_tree(&src, &dest)?;
        } else {
            tracing::debug!("skipping special file {}", src.display());
        }
    }
    Ok(copied)
}
