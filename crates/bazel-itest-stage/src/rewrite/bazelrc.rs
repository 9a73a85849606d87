//! `.bazelrc` import splicing and appending.

use std::path::Path;

use bazel_itest_core::{Result, Runfiles};
use bazel_itest_fs::{is_file, read_file, read_file_or_empty, write_file};
use indexmap::IndexMap;

use super::{log_file_contents, BAZELRC};

pub const APPEND_SEPARATOR: &str = "\n\n# Appended by bazel-itest\n";

/// Replace each import placeholder, in map order, with the contents of the
/// file it maps to.
/// Skipped when there is nothing to splice or the workspace has no `.bazelrc`.
pub fn splice_imports(
    runfiles: &Runfiles,
    imports: &IndexMap<String, String>,
    workspace_root: &Path,
) -> Result<()> {
    let path = workspace_root.join(BAZELRC);
    if imports.is_empty() || !is_file(&path) {
        return Ok(());
    }
    let mut contents = read_file(&path)?;
    for (placeholder, logical) in imports {
        if placeholder.is_empty() {
            tracing::warn!("ignoring empty .bazelrc import placeholder for {}", logical);
            continue;
        }
        let source = runfiles.rlocation(logical)?;
        let import = read_file(&source)?;
        contents = splice(&contents, placeholder, &import);
    }
    write_file(&path, &contents)?;
    log_file_contents(".bazelrc file with replacements:", &contents);
    Ok(())
}

/// Append `text` after a separator comment. A missing `.bazelrc` is created.
pub fn append(workspace_root: &Path, text: &str) -> Result<()> {
    let path = workspace_root.join(BAZELRC);
    let contents = appended(&read_file_or_empty(&path)?, text);
    write_file(&path, &contents)?;
    log_file_contents(".bazelrc file after appending:", &contents);
    Ok(())
}

pub fn splice(contents: &str, placeholder: &str, import: &str) -> String {
    contents.replace(placeholder, import)
}

pub fn appended(contents: &str, text: &str) -> String {
    let mut out = String::with_capacity(contents.len() + APPEND_SEPARATOR.len() + text.len());
    out.push_str(contents);
    out.push_str(APPEND_SEPARATOR);
    out.push_str(text);
    out
}
