//! File operations used while staging a workspace under test.
//!
//! - `copy`: byte-exact file copy and recursive tree copy (symlinks followed)
//! - `scratch`: exclusively owned scratch directories with optional keep-on-exit
//!
//! Every read and write here is whole-file: contents are loaded, transformed by
//! the caller in memory, then written back in one go.

pub mod copy;
pub mod scratch;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use copy::{copy_file, copy_tree};
pub use scratch::ScratchPool;

/// Errors from file operations. Each variant carries the path it failed on.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {} -> {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FsError>;

pub(crate) fn io_err(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> FsError {
    let path = path.to_path_buf();
    move |source| FsError::Io {
        action,
        path,
        source,
    }
}

/// Checks if a path exists and is a directory. Symlinks are resolved.
pub fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Checks if a path exists and is a regular file. Symlinks are resolved.
pub fn is_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Read a UTF-8 file in full.
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(io_err("read", path))
}

/// Read a UTF-8 file in full, treating a missing file as empty.
pub fn read_file_or_empty(path: &Path) -> Result<String> {
    if is_file(path) {
        read_file(path)
    } else {
        Ok(String::new())
    }
}

/// Overwrite a file with `contents`.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(io_err("write", path))
}

/// Create `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(io_err("create directory", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_file_or_empty_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let contents = read_file_or_empty(&tmp.path().join(".bazelrc")).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("WORKSPACE");
        write_file(&path, "workspace(name = \"e2e\")\n").unwrap();
        assert!(is_file(&path));
        assert!(!is_dir(&path));
        assert_eq!(read_file(&path).unwrap(), "workspace(name = \"e2e\")\n");
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("package.json");
        let err = read_file(&path).unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }
}
