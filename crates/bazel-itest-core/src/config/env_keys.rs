//! 环境变量 key 常量
//!
//! Bazel 在 test/run 时注入的变量保持原名；本工具自身的开关使用 `BAZEL_ITEST_*`。

/// Runfiles 解析（Bazel test 协议）
pub mod runfiles {
    /// Windows 上 Bazel 设置为 "1"，只能通过 MANIFEST 解析 runfiles
    pub const RUNFILES_MANIFEST_ONLY: &str = "RUNFILES_MANIFEST_ONLY";
    pub const RUNFILES_MANIFEST_FILE: &str = "RUNFILES_MANIFEST_FILE";
    pub const RUNFILES_DIR: &str = "RUNFILES_DIR";
    pub const TEST_WORKSPACE: &str = "TEST_WORKSPACE";

    /// Force the MANIFEST code path on Linux/macOS when a MANIFEST file exists
    /// next to the runfiles tree (only outside the test sandbox, e.g. `bazel run`).
    pub const BAZEL_ITEST_TEST_MANIFEST: &str = "BAZEL_ITEST_TEST_MANIFEST";

    /// File name of the manifest inside `RUNFILES_DIR`.
    pub const MANIFEST_FILE_NAME: &str = "MANIFEST";
}

/// 运行模式
pub mod run {
    /// `dbg` keeps scratch directories after exit.
    pub const COMPILATION_MODE: &str = "COMPILATION_MODE";
    pub const DEBUG_COMPILATION_MODE: &str = "dbg";

    /// Any non-empty value enables verbose logs and `bazel info`.
    pub const VERBOSE_LOGS: &str = "VERBOSE_LOGS";
}

/// 可观测性与日志
pub mod observability {
    pub const BAZEL_ITEST_QUIET: &str = "BAZEL_ITEST_QUIET";
    pub const BAZEL_ITEST_LOG_LEVEL: &str = "BAZEL_ITEST_LOG_LEVEL";
    pub const BAZEL_ITEST_LOG_JSON: &str = "BAZEL_ITEST_LOG_JSON";
}
