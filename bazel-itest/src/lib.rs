//! bazel-itest CLI library: stage the workspace under test, then drive Bazel.

pub mod cli;
pub mod command;
pub mod observability;
pub mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bazel_itest_core::config::{RunSettings, RunfilesSettings};
use bazel_itest_core::{ItestError, RunConfig, Runfiles};
use bazel_itest_fs::ScratchPool;
use clap::Parser;

use cli::Cli;
use command::CommandSpec;
use runner::{BazelRunner, RunOutcome};

/// Parse args, run, and map the result to an exit status.
pub fn run_cli() -> ExitCode {
    let cli = Cli::parse();
    let settings = RunSettings::from_env();
    observability::init_tracing(cli.verbose || settings.verbose);

    match run(&cli, settings) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            let message = fatal_message(&e);
            tracing::error!("{}", message);
            eprintln!("bazel-itest: {}", message);
            ExitCode::FAILURE
        }
    }
}

/// Top-level diagnostic, prefixed by the kind of failure when it is known.
fn fatal_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ItestError>() {
        Some(e) if e.is_verification() => format!("substitution check failed: {:#}", err),
        Some(e) if e.is_resolution() => format!("input not found: {:#}", err),
        _ => format!("{:#}", err),
    }
}

/// Stage, rewrite and run. Internal failures are errors; a failing build-tool
/// invocation is a [`RunOutcome::Failed`] carrying its exit status.
pub fn run(cli: &Cli, settings: RunSettings) -> Result<RunOutcome> {
    let verbose = cli.verbose || settings.verbose;
    let keep = cli.keep_scratch || settings.debug || cli.stage_only;

    let runfiles = Runfiles::from_settings(&RunfilesSettings::from_env())
        .context("failed to load runfiles")?;

    let config_path = resolve_config_path(&runfiles, &cli.config)?;
    let config = RunConfig::load(&config_path)?;
    tracing::debug!("config: {}", serde_json::to_string_pretty(&config)?);
    tracing::debug!("testArgs: {}", serde_json::to_string_pretty(&cli.test_args)?);

    let mut pool = match &cli.scratch_root {
        Some(root) => ScratchPool::in_dir(root, keep),
        None => ScratchPool::new(keep),
    };
    let workspace_root = bazel_itest_stage::stage_workspace(&runfiles, &mut pool, &config)?;

    if cli.stage_only {
        tracing::info!("staged workspace under test at {}", workspace_root.display());
        println!("{}", workspace_root.display());
        return Ok(RunOutcome::Success);
    }

    let binary = runner::bazel_binary(&runfiles, &config.bazel_binary_workspace)?;
    if keep || verbose {
        tracing::info!(
            "\n\n{stars}\nbazel binary under test is {}\nworkspace under test root is {}\n{stars}\n",
            binary.display(),
            workspace_root.display(),
            stars = "*".repeat(80)
        );
    }

    let commands: Vec<CommandSpec> = config
        .bazel_commands
        .iter()
        .map(|c| CommandSpec::parse(c))
        .collect();
    let runner = BazelRunner::new(binary, workspace_root);
    let outcome = runner.run_all(&commands, &cli.test_args, verbose)?;
    drop(pool);
    Ok(outcome)
}

/// The config path as given when it names a file, else a runfiles lookup.
fn resolve_config_path(runfiles: &Runfiles, config: &str) -> Result<PathBuf> {
    let direct = PathBuf::from(config);
    if bazel_itest_fs::is_file(&direct) {
        return Ok(direct);
    }
    runfiles
        .rlocation(config)
        .with_context(|| format!("run config {} not found", config))
}


#[cfg(all(test, unix))]
mod e2e_tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    struct Fixture {
        root: tempfile::TempDir,
    }

    impl Fixture {
        /// Workspace fixture, archive, fake bazel exiting `version_exit` on
        /// `version`, and a config wiring them together.
        fn new(workspace: &str, version_exit: i32) -> Self {
            let root = tempfile::tempdir().unwrap();
            let p = root.path();
            fs::create_dir_all(p.join("ws/src")).unwrap();
            fs::create_dir_all(p.join("bin")).unwrap();
            fs::create_dir_all(p.join("scratch")).unwrap();
            fs::write(p.join("ws/WORKSPACE"), workspace).unwrap();
            fs::write(p.join("ws/src/BUILD.bazel"), "").unwrap();
            fs::write(p.join("rules_x.tar.gz"), "").unwrap();

            let log = p.join("calls.log");
            let script = format!(
                "#!/bin/sh\necho \"$*\" >> '{}'\n[ \"$1\" = version ] && exit {}\nexit 0\n",
                log.display(),
                version_exit
            );
            fs::write(p.join("bin/bazel"), script).unwrap();
            fs::set_permissions(p.join("bin/bazel"), fs::Permissions::from_mode(0o755)).unwrap();

            let config = serde_json::json!({
                "workspaceRoot": p.join("ws"),
                "repositories": {"rules_x": p.join("rules_x.tar.gz")},
                "bazelBinaryWorkspace": p.join("bin"),
                "bazelCommands": ["build //...", "test //..."],
            });
            fs::write(p.join("config.json"), config.to_string()).unwrap();
            Self { root }
        }

        fn path(&self) -> &Path {
            self.root.path()
        }

        fn cli(&self, stage_only: bool) -> Cli {
            Cli {
                config: self.path().join("config.json").display().to_string(),
                keep_scratch: false,
                verbose: false,
                stage_only,
                scratch_root: Some(self.path().join("scratch")),
                test_args: vec!["--config=ci".to_string()],
            }
        }

        fn calls(&self) -> Vec<String> {
            fs::read_to_string(self.path().join("calls.log"))
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    const WORKSPACE: &str = "http_archive(\n    name = \"rules_x\",\n    url = \"https://x\",\n)\n";

    #[test]
    fn test_run_end_to_end() {
        let fx = Fixture::new(WORKSPACE, 0);
        let outcome = run(&fx.cli(false), RunSettings::default()).unwrap();
        assert!(outcome.is_success());
        assert_eq!(
            fx.calls(),
            vec!["version", "build //... --config=ci", "test //... --config=ci"]
        );
        // scratch directories are removed once the run finishes
        assert_eq!(fs::read_dir(fx.path().join("scratch")).unwrap().count(), 0);
        // the source fixture is never touched
        assert_eq!(fs::read_to_string(fx.path().join("ws/WORKSPACE")).unwrap(), WORKSPACE);
    }

    #[test]
    fn test_version_exit_status_propagates() {
        let fx = Fixture::new(WORKSPACE, 3);
        let outcome = run(&fx.cli(false), RunSettings::default()).unwrap();
        assert_eq!(outcome.code(), 3);
        assert_eq!(fx.calls(), vec!["version"]);
    }

    #[test]
    fn test_failed_replacement_runs_nothing() {
        let fx = Fixture::new("workspace(name = \"e2e\")\n", 0);
        let err = run(&fx.cli(false), RunSettings::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("rules_x"));
        assert!(fx.calls().is_empty());
    }

    #[test]
    fn test_stage_only_keeps_workspace() {
        let fx = Fixture::new(WORKSPACE, 0);
        let outcome = run(&fx.cli(true), RunSettings::default()).unwrap();
        assert!(outcome.is_success());
        assert!(fx.calls().is_empty());

        let staged: Vec<_> = fs::read_dir(fx.path().join("scratch"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(staged.len(), 1);
        let workspace = fs::read_to_string(staged[0].join("WORKSPACE")).unwrap();
        assert!(workspace.contains("file:"));
        assert!(staged[0].join("src/BUILD.bazel").is_file());
    }
}
