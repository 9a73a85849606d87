//! Error types shared by the staging crates.
//!
//! Resolution errors name the resource that could not be found. Verification
//! errors name the key whose substitution did not take effect; a silent
//! non-substitution would turn the build under test into a false positive.

use std::path::PathBuf;

use bazel_itest_fs::FsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItestError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    ConfigInvalid(String),

    #[error("invalid match pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    // ─── Resolution ─────────────────────────────────────────────────────────
    #[error("workspace under test not found at {}", .0.display())]
    WorkspaceNotFound(PathBuf),

    #[error("no workspace files found under path {0}")]
    NoWorkspaceFiles(String),

    #[error("npm package {package} not found at {}", location.display())]
    PackageNotFound { package: String, location: PathBuf },

    #[error("runfile {0} not found")]
    RunfileNotFound(String),

    #[error("TEST_WORKSPACE is not set; cannot locate {0} in the runfiles manifest")]
    MissingTestWorkspace(String),

    // ─── Verification ───────────────────────────────────────────────────────
    #[error("WORKSPACE replacement for repository {0} failed!")]
    RepositoryReplacement(String),

    #[error("package.json replacement for npm package {0} failed!")]
    NpmPackageReplacement(String),

    #[error("package.json replacement for key {0} failed!")]
    PackageJsonReplacement(String),

    #[error(
        "expected replacement of npm package {0} for locally generated npm_package not found; \
         add {0} to npm_packages attribute"
    )]
    UnreplacedNpmPackage(String),
}

impl ItestError {
    /// A substitution was requested but is absent from the rewritten file.
    pub fn is_verification(&self) -> bool {
        matches!(
            self,
            Self::RepositoryReplacement(_)
                | Self::NpmPackageReplacement(_)
                | Self::PackageJsonReplacement(_)
                | Self::UnreplacedNpmPackage(_)
        )
    }

    /// A workspace, package or runfile could not be located.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::WorkspaceNotFound(_)
                | Self::NoWorkspaceFiles(_)
                | Self::PackageNotFound { .. }
                | Self::RunfileNotFound(_)
                | Self::MissingTestWorkspace(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ItestError>;
