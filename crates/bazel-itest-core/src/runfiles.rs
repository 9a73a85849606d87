//! Runfiles resolution.
//!
//! Bazel exposes a test's data dependencies either as a browsable directory
//! tree or, where symlinks are unavailable (Windows), only through a MANIFEST
//! file mapping logical paths to real paths. The mode is decided once at
//! startup; the resulting [`Runfiles`] value is passed to every resolver.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use crate::config::RunfilesSettings;
use crate::error::{ItestError, Result};

/// Logical runfiles path → real filesystem path, parsed from a MANIFEST.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunfilesIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl RunfilesIndex {
    /// Parse `<logical> <real>` records, one per line. Blank lines are
    /// skipped; a later record for the same key replaces the earlier one.
    pub fn parse(input: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in input.lines() {
            if line.is_empty() {
                continue;
            }
            let (logical, real) = line.split_once(' ').unwrap_or((line, ""));
            entries.insert(logical.to_string(), PathBuf::from(real));
        }
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let input = bazel_itest_fs::read_file(path)?;
        let index = Self::parse(&input);
        tracing::debug!(
            "loaded runfiles manifest {} ({} entries)",
            path.display(),
            index.len()
        );
        Ok(index)
    }

    pub fn get(&self, logical: &str) -> Option<&Path> {
        self.entries.get(logical).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose logical path starts with `prefix`, yielded as
    /// (path relative to the prefix, real path).
    pub fn entries_under<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Path)> + 'a {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(move |(key, real)| (&key[prefix.len()..], real.as_path()))
    }
}

impl<K: Into<String>, V: Into<PathBuf>> FromIterator<(K, V)> for RunfilesIndex {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolution context: manifest index (if any) plus the directories used in
/// directory mode.
#[derive(Debug, Clone)]
pub struct Runfiles {
    index: Option<RunfilesIndex>,
    runfiles_dir: Option<PathBuf>,
    parent_dir: PathBuf,
    test_workspace: Option<String>,
}

impl Runfiles {
    /// Pick the resolution mode from the Bazel environment, loading the
    /// manifest when it applies.
    pub fn from_settings(settings: &RunfilesSettings) -> Result<Self> {
        let default_manifest = settings.default_manifest_path();
        let use_manifest = settings.manifest_only
            || (settings.test_manifest
                && default_manifest
                    .as_deref()
                    .is_some_and(bazel_itest_fs::is_file));

        let index = if use_manifest {
            let path = settings
                .manifest_file
                .clone()
                .or(default_manifest)
                .ok_or_else(|| ItestError::RunfileNotFound("MANIFEST".to_string()))?;
            Some(RunfilesIndex::load(&path)?)
        } else {
            None
        };

        let parent_dir = settings
            .working_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| settings.working_dir.join(".."));

        Ok(Self {
            index,
            runfiles_dir: settings.runfiles_dir.clone(),
            parent_dir,
            test_workspace: settings.test_workspace.clone(),
        })
    }

    /// Directory mode rooted at `parent_dir` (the runfiles root).
    pub fn directory(parent_dir: impl Into<PathBuf>) -> Self {
        Self {
            index: None,
            runfiles_dir: None,
            parent_dir: parent_dir.into(),
            test_workspace: None,
        }
    }

    /// Manifest mode over an already-built index.
    pub fn manifest(index: RunfilesIndex) -> Self {
        Self {
            index: Some(index),
            runfiles_dir: None,
            parent_dir: PathBuf::from(".."),
            test_workspace: None,
        }
    }

    pub fn with_test_workspace(mut self, name: impl Into<String>) -> Self {
        self.test_workspace = Some(name.into());
        self
    }

    pub fn index(&self) -> Option<&RunfilesIndex> {
        self.index.as_ref()
    }

    pub fn is_manifest(&self) -> bool {
        self.index.is_some()
    }

    pub fn test_workspace(&self) -> Option<&str> {
        self.test_workspace.as_deref()
    }

    /// Parent of the test's working directory; local packages resolve
    /// against it in directory mode.
    pub fn parent_dir(&self) -> &Path {
        &self.parent_dir
    }

    /// Resolve a logical runfiles path to a real path. Absolute paths pass
    /// through unchanged.
    pub fn rlocation(&self, logical: &str) -> Result<PathBuf> {
        let path = Path::new(logical);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        if let Some(index) = &self.index {
            return index
                .get(logical)
                .map(Path::to_path_buf)
                .ok_or_else(|| ItestError::RunfileNotFound(logical.to_string()));
        }
        self.runfiles_dir
            .iter()
            .chain(std::iter::once(&self.parent_dir))
            .map(|root| root.join(logical))
            .find(|candidate| candidate.exists())
            .ok_or_else(|| ItestError::RunfileNotFound(logical.to_string()))
    }
}
