use std::path::PathBuf;

use clap::Parser;

/// bazel-itest - run Bazel against a staged copy of a workspace fixture
#[derive(Parser, Debug)]
#[command(name = "bazel-itest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON run config (resolved through runfiles when not found as given)
    #[arg(value_name = "CONFIG")]
    pub config: String,

    /// Keep scratch directories after exit (default: COMPILATION_MODE=dbg)
    #[arg(long, default_value = "false")]
    pub keep_scratch: bool,

    /// Verbose logs and `bazel info` (default: VERBOSE_LOGS)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Stage and rewrite the workspace, print its path, skip every bazel invocation
    #[arg(long, default_value = "false")]
    pub stage_only: bool,

    /// Directory to allocate scratch directories in (default: system temp dir)
    #[arg(long, value_name = "DIR", env = "BAZEL_ITEST_SCRATCH_ROOT")]
    pub scratch_root: Option<PathBuf>,

    /// Extra arguments for every bazel command, inserted before `--` when present
    #[arg(value_name = "TEST_ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub test_args: Vec<String>,
}
