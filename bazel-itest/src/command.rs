//! Build-tool command lines from the run config.

/// Extra test arguments go in front of this token when a command has one,
/// keeping them ahead of arguments forwarded to `bazel run` targets.
pub const EXTRA_ARGS_MARKER: &str = "--";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    args: Vec<String>,
}

impl CommandSpec {
    /// Split a whitespace-delimited command such as `test //... --config=ci`.
    pub fn parse(command: &str) -> Self {
        Self {
            args: command.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments with `extra` spliced in before the first `--`, or appended.
    pub fn with_extra_args(&self, extra: &[String]) -> Vec<String> {
        let mut args = Vec::with_capacity(self.args.len() + extra.len());
        match self.args.iter().position(|a| a == EXTRA_ARGS_MARKER) {
            Some(pos) => {
                args.extend_from_slice(&self.args[..pos]);
                args.extend_from_slice(extra);
                args.extend_from_slice(&self.args[pos..]);
            }
            None => {
                args.extend_from_slice(&self.args);
                args.extend_from_slice(extra);
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let spec = CommandSpec::parse("  test   //...\t--config=ci ");
        assert_eq!(spec.args(), strings(&["test", "//...", "--config=ci"]).as_slice());
    }

    #[test]
    fn test_extra_args_appended() {
        let spec = CommandSpec::parse("test //...");
        let extra = strings(&["--test_output=errors"]);
        assert_eq!(
            spec.with_extra_args(&extra),
            strings(&["test", "//...", "--test_output=errors"])
        );
    }

    #[test]
    fn test_extra_args_before_marker() {
        let spec = CommandSpec::parse("run //:bin -- --port 8080");
        let extra = strings(&["--config=ci", "-s"]);
        assert_eq!(
            spec.with_extra_args(&extra),
            strings(&["run", "//:bin", "--config=ci", "-s", "--", "--port", "8080"])
        );
    }

    #[test]
    fn test_no_extra_args() {
        let spec = CommandSpec::parse("build //...");
        assert_eq!(spec.with_extra_args(&[]), strings(&["build", "//..."]));
    }
}
