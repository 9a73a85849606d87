//! `package.json` dependency rewriting.
//!
//! Entries are matched textually as `"<key>": "<value>` so the surrounding
//! formatting survives byte for byte; only the value text is swapped.

use std::path::Path;

use bazel_itest_core::{ItestError, Result, RunConfig, Runfiles};
use bazel_itest_fs::{is_file, read_file, write_file, ScratchPool};
use regex::NoExpand;

use super::{compile, log_file_contents, portable_path, PACKAGE_JSON};
use crate::materialize::materialize_package;

/// Run the three package.json passes and write the result back. Skipped when
/// the workspace has no package.json.
pub fn rewrite_package_json(
    runfiles: &Runfiles,
    pool: &mut ScratchPool,
    config: &RunConfig,
    workspace_root: &Path,
) -> Result<()> {
    let path = workspace_root.join(PACKAGE_JSON);
    if !is_file(&path) {
        return Ok(());
    }
    let mut contents = read_file(&path)?;

    for (key, package_path) in &config.npm_packages {
        tracing::debug!("copying npm package {} to tmp", key);
        let package_dir = portable_path(&materialize_package(runfiles, pool, package_path)?);
        contents = replace_dependency(&contents, key, &format!("file:{}", package_dir))?;
        if !contents.contains(&package_dir) {
            return Err(ItestError::NpmPackageReplacement(key.clone()));
        }
    }

    for (key, value) in &config.package_json_replacements {
        contents = replace_dependency(&contents, key, value)?;
        if !contents.contains(&entry_text(key, value)) {
            return Err(ItestError::PackageJsonReplacement(key.clone()));
        }
    }

    for key in &config.check_npm_packages {
        check_local_reference(&contents, key)?;
    }

    write_file(&path, &contents)?;
    log_file_contents("package.json file with replacements:", &contents);
    Ok(())
}

/// Replace the value of the first `"<key>": "..."` entry with `value`.
/// Contents are returned unchanged when the key has no non-empty string value.
pub fn replace_dependency(contents: &str, key: &str, value: &str) -> Result<String> {
    let pattern = compile(&format!(r#""{}"\s*:\s*"[^"]+"#, regex::escape(key)))?;
    let replacement = entry_text(key, value);
    Ok(pattern
        .replacen(contents, 1, NoExpand(&replacement))
        .into_owned())
}

/// Fails if `key` is still referenced without a `file:` value, meaning it
/// was left out of the npm package mapping.
pub fn check_local_reference(contents: &str, key: &str) -> Result<()> {
    let quoted = format!("\"{}\"", key);
    let local = format!("\"{}\": \"file:", key);
    if contents.contains(&quoted) && !contents.contains(&local) {
        return Err(ItestError::UnreplacedNpmPackage(key.to_string()));
    }
    Ok(())
}

/// `"<key>": "<value>` with the closing quote left to the existing text.
fn entry_text(key: &str, value: &str) -> String {
    format!("\"{}\": \"{}", key, value)
}
