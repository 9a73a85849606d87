//! Copies the workspace under test and local npm packages into scratch space.
//!
//! In manifest mode every index entry under the workspace prefix is copied
//! file by file; in directory mode the source tree is copied recursively.
//! Each call gets its own scratch directory: the build tool under test may
//! write into workspaces and package roots, so nothing is ever shared.

use std::path::{Path, PathBuf};

use bazel_itest_core::{ItestError, Result, Runfiles};
use bazel_itest_fs::{copy_file, copy_tree, is_dir, ScratchPool};

/// Copy the workspace at `workspace_path` into a fresh scratch directory and
/// return its path.
///
/// `workspace_path` is relative to the test's working directory, with
/// external repositories written as `../<repo>/<path>`.
pub fn materialize_workspace(
    runfiles: &Runfiles,
    pool: &mut ScratchPool,
    workspace_path: &str,
) -> Result<PathBuf> {
    match runfiles.index() {
        Some(index) => {
            let prefix = manifest_prefix(runfiles, workspace_path)?;
            let to = pool.allocate()?;
            let mut copied = 0usize;
            for (relative, real) in index.entries_under(&prefix) {
                let dest = to.join(relative);
                tracing::debug!("copying (MANIFEST) {} -> {}", real.display(), dest.display());
                copy_file(real, &dest)?;
                copied += 1;
            }
            if copied == 0 {
                return Err(ItestError::NoWorkspaceFiles(workspace_path.to_string()));
            }
            tracing::debug!("copied {} workspace files from manifest prefix {}", copied, prefix);
            Ok(to)
        }
        None => {
            let from = Path::new(workspace_path);
            if !is_dir(from) {
                return Err(ItestError::WorkspaceNotFound(from.to_path_buf()));
            }
            let to = pool.allocate()?;
            let copied = copy_tree(from, &to)?;
            tracing::debug!("copied {} workspace files from {}", copied, from.display());
            Ok(to)
        }
    }
}

/// Manifest key prefix for a workspace path. External paths drop their
/// leading `../`; local ones are qualified with the test's workspace name.
/// The prefix always ends in `/` so sibling directories sharing a name
/// prefix are not picked up.
pub fn manifest_prefix(runfiles: &Runfiles, workspace_path: &str) -> Result<String> {
    let mut prefix = match workspace_path.strip_prefix("../") {
        Some(rest) => rest.to_string(),
        None => {
            let workspace = runfiles
                .test_workspace()
                .ok_or_else(|| ItestError::MissingTestWorkspace(workspace_path.to_string()))?;
            format!("{}/{}", workspace, workspace_path)
        }
    };
    while prefix.ends_with('/') {
        prefix.pop();
    }
    prefix.push('/');
    Ok(prefix)
}

/// Copy the npm package at logical path `package_path` into its own fresh
/// scratch directory and return that directory.
pub fn materialize_package(
    runfiles: &Runfiles,
    pool: &mut ScratchPool,
    package_path: &str,
) -> Result<PathBuf> {
    let from = match runfiles.index() {
        Some(index) => index.get(package_path).map(Path::to_path_buf),
        None => Some(runfiles.parent_dir().join(package_path)),
    };
    let from = match from {
        Some(from) if is_dir(&from) => from,
        other => {
            return Err(ItestError::PackageNotFound {
                package: package_path.to_string(),
                location: other.unwrap_or_else(|| PathBuf::from(package_path)),
            })
        }
    };
    let to = pool.allocate()?;
    let copied = copy_tree(&from, &to)?;
    tracing::debug!(
        "copied npm package {} ({} files) -> {}",
        package_path,
        copied,
        to.display()
    );
    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazel_itest_core::RunfilesIndex;
    use std::fs;

    fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn relative_files(root: &Path) -> Vec<String> {
        fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(root, &path, out);
                } else {
                    let rel = path.strip_prefix(root).unwrap();
                    out.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        let mut out = Vec::new();
        walk(root, root, &mut out);
        out.sort();
        out
    }

    #[test]
    fn test_workspace_from_directory() {
        let src = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        write(src.path(), "a/b.txt", "b contents");
        write(src.path(), "c.txt", "c contents");

        let runfiles = Runfiles::directory(src.path());
        let mut pool = ScratchPool::in_dir(scratch.path(), false);
        let ws = materialize_workspace(&runfiles, &mut pool, src.path().to_str().unwrap()).unwrap();

        assert_eq!(relative_files(&ws), vec!["a/b.txt", "c.txt"]);
        assert_eq!(fs::read_to_string(ws.join("a/b.txt")).unwrap(), "b contents");
        assert_eq!(fs::read_to_string(ws.join("c.txt")).unwrap(), "c contents");
    }

    #[test]
    fn test_workspace_missing_directory() {
        let scratch = tempfile::tempdir().unwrap();
        let runfiles = Runfiles::directory(scratch.path());
        let mut pool = ScratchPool::in_dir(scratch.path(), false);
        let missing = scratch.path().join("does/not/exist");
        let err = materialize_workspace(&runfiles, &mut pool, missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ItestError::WorkspaceNotFound(_)));
        assert!(err.is_resolution());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_workspace_from_manifest_prefix() {
        let real = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let a = write(real.path(), "1", "a");
        let b = write(real.path(), "2", "b");
        let x = write(real.path(), "3", "x");
        let index: RunfilesIndex = [
            ("main/foo/a.txt", a),
            ("main/foo/bar/b.txt", b),
            ("main/baz/x.txt", x),
        ]
        .into_iter()
        .collect();

        let runfiles = Runfiles::manifest(index).with_test_workspace("main");
        let mut pool = ScratchPool::in_dir(scratch.path(), false);
        let ws = materialize_workspace(&runfiles, &mut pool, "foo").unwrap();

        assert_eq!(relative_files(&ws), vec!["a.txt", "bar/b.txt"]);
        assert_eq!(fs::read_to_string(ws.join("bar/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_workspace_from_manifest_external() {
        let real = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let a = write(real.path(), "1", "a");
        let index: RunfilesIndex = [("rules_x/e2e/ws/WORKSPACE", a)].into_iter().collect();

        let runfiles = Runfiles::manifest(index);
        let mut pool = ScratchPool::in_dir(scratch.path(), false);
        let ws = materialize_workspace(&runfiles, &mut pool, "../rules_x/e2e/ws").unwrap();
        assert_eq!(relative_files(&ws), vec!["WORKSPACE"]);
    }

    #[test]
    fn test_workspace_manifest_no_match() {
        let scratch = tempfile::tempdir().unwrap();
        let index: RunfilesIndex = [("main/baz/x.txt", "/x")].into_iter().collect();
        let runfiles = Runfiles::manifest(index).with_test_workspace("main");
        let mut pool = ScratchPool::in_dir(scratch.path(), false);
        let err = materialize_workspace(&runfiles, &mut pool, "foo").unwrap_err();
        assert!(matches!(err, ItestError::NoWorkspaceFiles(ref p) if p == "foo"));
    }

    #[test]
    fn test_manifest_prefix() {
        let runfiles = Runfiles::manifest(RunfilesIndex::default()).with_test_workspace("main");
        assert_eq!(manifest_prefix(&runfiles, "e2e/foo").unwrap(), "main/e2e/foo/");
        assert_eq!(manifest_prefix(&runfiles, "e2e/foo/").unwrap(), "main/e2e/foo/");
        assert_eq!(manifest_prefix(&runfiles, "../ext/foo").unwrap(), "ext/foo/");

        let anonymous = Runfiles::manifest(RunfilesIndex::default());
        assert!(matches!(
            manifest_prefix(&anonymous, "e2e/foo"),
            Err(ItestError::MissingTestWorkspace(_))
        ));
    }

    #[test]
    fn test_package_from_directory_is_isolated() {
        let root = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        write(root.path(), "main/packages/pkg-a/package.json", "{}");
        write(root.path(), "main/packages/pkg-a/lib/index.js", "module.exports = 1;");

        let runfiles = Runfiles::directory(root.path());
        let mut pool = ScratchPool::in_dir(scratch.path(), false);
        let first = materialize_package(&runfiles, &mut pool, "main/packages/pkg-a").unwrap();
        let second = materialize_package(&runfiles, &mut pool, "main/packages/pkg-a").unwrap();

        assert_ne!(first, second);
        assert_eq!(relative_files(&first), vec!["lib/index.js", "package.json"]);
        assert_eq!(relative_files(&second), relative_files(&first));
    }

    #[test]
    fn test_package_from_manifest() {
        let real = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        write(real.path(), "pkg/package.json", "{\"name\": \"pkg-a\"}");
        let index: RunfilesIndex = [("main/pkg-a", real.path().join("pkg"))].into_iter().collect();

        let runfiles = Runfiles::manifest(index);
        let mut pool = ScratchPool::in_dir(scratch.path(), false);
        let to = materialize_package(&runfiles, &mut pool, "main/pkg-a").unwrap();
        assert!(to.join("package.json").is_file());
    }

    #[test]
    fn test_package_not_found() {
        let scratch = tempfile::tempdir().unwrap();
        let runfiles = Runfiles::manifest(RunfilesIndex::default());
        let mut pool = ScratchPool::in_dir(scratch.path(), false);
        let err = materialize_package(&runfiles, &mut pool, "main/missing").unwrap_err();
        assert!(err.to_string().contains("main/missing"));
        assert!(matches!(err, ItestError::PackageNotFound { .. }));
    }
}
