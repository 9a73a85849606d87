//! 按领域分组的配置结构体
//!
//! 从环境变量加载，统一 fallback 逻辑。每个结构体都是普通值，测试中可直接构造。

use super::env_keys::{observability as obv_keys, run as run_keys, runfiles as rf_keys};
use super::loader::{env_bool, env_flag, env_optional, env_or};
use std::path::PathBuf;

/// Runfiles 解析所需的 Bazel 环境
#[derive(Debug, Clone, Default)]
pub struct RunfilesSettings {
    /// `RUNFILES_MANIFEST_ONLY=1`
    pub manifest_only: bool,
    pub manifest_file: Option<PathBuf>,
    pub runfiles_dir: Option<PathBuf>,
    /// Logical name of the workspace the test target lives in.
    pub test_workspace: Option<String>,
    /// Exercise the manifest code path when a MANIFEST is discoverable.
    pub test_manifest: bool,
    /// Working directory of the test process; directory-mode lookups resolve
    /// against its parent.
    pub working_dir: PathBuf,
}

impl RunfilesSettings {
    pub fn from_env() -> Self {
        Self {
            manifest_only: env_optional(rf_keys::RUNFILES_MANIFEST_ONLY).as_deref()
                == Some("1"),
            manifest_file: env_optional(rf_keys::RUNFILES_MANIFEST_FILE).map(PathBuf::from),
            runfiles_dir: env_optional(rf_keys::RUNFILES_DIR).map(PathBuf::from),
            test_workspace: env_optional(rf_keys::TEST_WORKSPACE),
            test_manifest: env_bool(rf_keys::BAZEL_ITEST_TEST_MANIFEST, false),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// `$RUNFILES_DIR/MANIFEST`, if `RUNFILES_DIR` is set.
    pub fn default_manifest_path(&self) -> Option<PathBuf> {
        self.runfiles_dir
            .as_ref()
            .map(|d| d.join(rf_keys::MANIFEST_FILE_NAME))
    }
}

/// 运行模式开关
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSettings {
    /// `COMPILATION_MODE=dbg`: scratch directories are kept after exit.
    pub debug: bool,
    /// `VERBOSE_LOGS`: dump config and rewritten files, run `bazel info`.
    pub verbose: bool,
}

impl RunSettings {
    pub fn from_env() -> Self {
        Self {
            debug: env_optional(run_keys::COMPILATION_MODE).as_deref()
                == Some(run_keys::DEBUG_COMPILATION_MODE),
            verbose: env_flag(run_keys::VERBOSE_LOGS),
        }
    }
}

/// 可观测性配置：quiet、log_level、log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self {
            quiet: env_bool(obv_keys::BAZEL_ITEST_QUIET, false),
            log_level: env_or(obv_keys::BAZEL_ITEST_LOG_LEVEL, || {
                "bazel_itest=info".to_string()
            }),
            log_json: env_bool(obv_keys::BAZEL_ITEST_LOG_JSON, false),
        }
    }
}
