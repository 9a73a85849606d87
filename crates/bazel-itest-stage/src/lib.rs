//! Workspace staging: copy the fixture into scratch space, then rewrite its
//! dependency references to point at locally built artifacts.

pub mod materialize;
pub mod rewrite;

use std::path::PathBuf;

use bazel_itest_core::{Result, RunConfig, Runfiles};
use bazel_itest_fs::ScratchPool;

pub use materialize::{materialize_package, materialize_workspace};
pub use rewrite::rewrite_workspace;

/// Materialize the configured workspace and apply every rewrite pass.
/// Returns the root of the staged workspace.
pub fn stage_workspace(
    runfiles: &Runfiles,
    pool: &mut ScratchPool,
    config: &RunConfig,
) -> Result<PathBuf> {
    let workspace_path = config.workspace_path();
    tracing::debug!("copying workspace under test {} to tmp", workspace_path);
    let workspace_root = materialize_workspace(runfiles, pool, &workspace_path)?;
    rewrite_workspace(runfiles, pool, config, &workspace_root)?;
    Ok(workspace_root)
}
