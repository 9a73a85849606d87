//! Drives the build tool against the staged workspace.
//!
//! Every invocation runs with the staged workspace as working directory and
//! the child's stdio connected to ours. The first non-zero exit status stops
//! the run and becomes the process exit status.

use std::path::PathBuf;
use std::process::{Command, ExitCode, ExitStatus, Stdio};

use anyhow::{Context, Result};
use bazel_itest_core::Runfiles;

use crate::command::CommandSpec;

/// Status of a run: success, or the exit status of the first failing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    Failed(i32),
}

impl RunOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        match status_code(status) {
            0 => Self::Success,
            code => Self::Failed(code),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Status for `std::process::exit`; codes outside 1..=255 become 1.
    pub fn code(&self) -> u8 {
        match *self {
            Self::Success => 0,
            Self::Failed(code) => u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Platform-specific file name of the build tool binary.
pub fn bazel_binary_name() -> &'static str {
    if cfg!(windows) {
        "bazel.exe"
    } else {
        "bazel"
    }
}

/// Locate the build tool binary inside the logical directory `binary_workspace`.
pub fn bazel_binary(runfiles: &Runfiles, binary_workspace: &str) -> Result<PathBuf> {
    let logical = format!(
        "{}/{}",
        binary_workspace.trim_end_matches('/'),
        bazel_binary_name()
    );
    runfiles
        .rlocation(&logical)
        .with_context(|| format!("bazel binary not found in {}", binary_workspace))
}

#[derive(Debug, Clone)]
pub struct BazelRunner {
    binary: PathBuf,
    workspace_root: PathBuf,
}

impl BazelRunner {
    pub fn new(binary: impl Into<PathBuf>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            workspace_root: workspace_root.into(),
        }
    }

    /// `version`, then `info` when verbose, then every command in order.
    /// Stops at the first failing invocation.
    pub fn run_all(
        &self,
        commands: &[CommandSpec],
        extra_args: &[String],
        verbose: bool,
    ) -> Result<RunOutcome> {
        tracing::info!("running 'bazel version'");
        let outcome = self.invoke(&["version".to_string()])?;
        if !outcome.is_success() {
            return Ok(outcome);
        }

        if verbose {
            tracing::debug!("running 'bazel info'");
            let outcome = self.invoke(&["info".to_string()])?;
            if !outcome.is_success() {
                return Ok(outcome);
            }
        }

        for command in commands {
            let args = command.with_extra_args(extra_args);
            tracing::info!("running 'bazel {}'", args.join(" "));
            let outcome = self.invoke(&args)?;
            if !outcome.is_success() {
                tracing::debug!("'bazel {}' exited with {:?}", args.join(" "), outcome);
                return Ok(outcome);
            }
        }
        Ok(RunOutcome::Success)
    }

    /// Run one invocation to completion.
    pub fn invoke(&self, args: &[String]) -> Result<RunOutcome> {
        let status = Command::new(&self.binary)
            .args(args)
            .current_dir(&self.workspace_root)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to run {}", self.binary.display()))?;
        Ok(RunOutcome::from_status(status))
    }
}
