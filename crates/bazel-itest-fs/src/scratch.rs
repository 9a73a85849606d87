//! Scratch directories for the workspace under test and its local packages.
//!
//! The pool owns every `TempDir` it hands out, so the directories outlive all
//! build-tool subprocesses and are removed together when the pool drops. In
//! keep mode nothing is removed and the paths stay usable for manual debugging.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{io_err, Result};

const SCRATCH_PREFIX: &str = "bazel-itest-";

#[derive(Debug)]
pub struct ScratchPool {
    keep: bool,
    parent: Option<PathBuf>,
    dirs: Vec<TempDir>,
}

impl ScratchPool {
    /// `keep = true` leaves every allocated directory on disk after drop.
    pub fn new(keep: bool) -> Self {
        Self {
            keep,
            parent: None,
            dirs: Vec::new(),
        }
    }

    /// Allocate under `parent` instead of the system temp dir.
    pub fn in_dir(parent: impl Into<PathBuf>, keep: bool) -> Self {
        Self {
            keep,
            parent: Some(parent.into()),
            dirs: Vec::new(),
        }
    }

    /// Create a fresh, uniquely named, empty directory and return its path.
    pub fn allocate(&mut self) -> Result<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX).keep(self.keep);
        let dir = match &self.parent {
            Some(parent) => builder
                .tempdir_in(parent)
                .map_err(io_err("create scratch directory in", parent))?,
            None => builder
                .tempdir()
                .map_err(io_err("create scratch directory in", &std::env::temp_dir()))?,
        };
        let path = dir.path().to_path_buf();
        tracing::debug!("allocated scratch directory {}", path.display());
        self.dirs.push(dir);
        Ok(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(|d| d.path())
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
