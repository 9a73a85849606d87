//! Run configuration written by the Bazel rule that declares the test.
//!
//! JSON with camelCase keys. Every map and list may be omitted. Map entries
//! are applied in the order they appear in the file.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ItestError, Result};

const EXTERNAL_PREFIX: &str = "external/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunConfig {
    /// Workspace under test, relative to the test's runfiles workspace
    /// (`e2e/foo`) or external (`external/repo/e2e/foo`).
    pub workspace_root: String,
    /// `.bazelrc` placeholder → logical path of the file spliced in its place.
    pub bazelrc_imports: IndexMap<String, String>,
    /// Text appended to `.bazelrc`.
    pub bazelrc_append: Option<String>,
    /// Repository name → logical path of a locally built archive.
    pub repositories: IndexMap<String, String>,
    /// package.json key → literal replacement value.
    #[serde(alias = "packageJsonRepacements")]
    pub package_json_replacements: IndexMap<String, String>,
    /// package.json key → logical path of a locally built npm package.
    pub npm_packages: IndexMap<String, String>,
    /// package.json keys that must reference a local `file:` package.
    pub check_npm_packages: Vec<String>,
    /// Logical directory holding the `bazel` binary.
    pub bazel_binary_workspace: String,
    /// Build-tool invocations, run in order.
    pub bazel_commands: Vec<String>,
}

impl RunConfig {
    pub fn from_json(json: &str, origin: &Path) -> Result<Self> {
        let config: RunConfig =
            serde_json::from_str(json).map_err(|source| ItestError::ConfigParse {
                path: origin.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = bazel_itest_fs::read_file(path)?;
        Self::from_json(&json, path)
    }

    fn validate(&self) -> Result<()> {
        if self.workspace_root.trim().is_empty() {
            return Err(ItestError::ConfigInvalid(
                "workspaceRoot must not be empty".to_string(),
            ));
        }
        if self.bazel_binary_workspace.trim().is_empty() {
            return Err(ItestError::ConfigInvalid(
                "bazelBinaryWorkspace must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Workspace path as seen from the test's working directory:
    /// `external/repo/path` becomes `../repo/path`.
    pub fn workspace_path(&self) -> String {
        match self.workspace_root.strip_prefix(EXTERNAL_PREFIX) {
            Some(rest) => format!("../{}", rest),
            None => self.workspace_root.clone(),
        }
    }

    /// Append text, with empty strings treated as absent.
    pub fn bazelrc_append(&self) -> Option<&str> {
        self.bazelrc_append.as_deref().filter(|s| !s.is_empty())
    }
}
