use std::process::ExitCode;

fn main() -> ExitCode {
    bazel_itest::run_cli()
}
