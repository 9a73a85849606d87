//! Rewrites the staged workspace so dependencies resolve to local artifacts.
//!
//! Passes run in a fixed order, each reading the whole file, transforming it
//! in memory and writing it back:
//!
//! 1. `.bazelrc` import splicing
//! 2. `.bazelrc` append
//! 3. `WORKSPACE` repository declarations → local `file:` archives
//! 4. `package.json` npm packages, literal replacements, local-package checks
//!
//! Every requested substitution is verified against the rewritten contents.

pub mod bazelrc;
pub mod package_json;
pub mod workspace_file;

use std::path::Path;

use bazel_itest_core::{ItestError, Result, RunConfig, Runfiles};
use bazel_itest_fs::ScratchPool;
use regex::Regex;

pub const BAZELRC: &str = ".bazelrc";
pub const WORKSPACE: &str = "WORKSPACE";
pub const PACKAGE_JSON: &str = "package.json";

/// Apply every rewrite pass to the staged workspace at `workspace_root`.
///
/// Local npm packages are materialized into `pool` along the way.
pub fn rewrite_workspace(
    runfiles: &Runfiles,
    pool: &mut ScratchPool,
    config: &RunConfig,
    workspace_root: &Path,
) -> Result<()> {
    bazelrc::splice_imports(runfiles, &config.bazelrc_imports, workspace_root)?;
    if let Some(text) = config.bazelrc_append() {
        bazelrc::append(workspace_root, text)?;
    }
    workspace_file::replace_repositories(runfiles, &config.repositories, workspace_root)?;
    package_json::rewrite_package_json(runfiles, pool, config, workspace_root)?;
    Ok(())
}

/// Forward slashes only; the rewritten files are read by tools that treat
/// backslashes as escapes.
pub(crate) fn portable_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub(crate) fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ItestError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn log_file_contents(desc: &str, contents: &str) {
    tracing::debug!(
        "{}\n{}\n{}\n{}\n",
        desc,
        "=".repeat(88),
        contents,
        "^".repeat(88)
    );
}
