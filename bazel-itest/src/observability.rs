//! Observability: tracing init.
//!
//! Uses config::ObservabilityConfig for BAZEL_ITEST_QUIET, LOG_LEVEL, LOG_JSON.
//! Everything goes to stderr; stdout belongs to the build tool under test.

use bazel_itest_core::config::ObservabilityConfig;
use tracing_subscriber::{prelude::*, EnvFilter};

const VERBOSE_LEVEL: &str = "bazel_itest=debug";
const QUIET_LEVEL: &str = "bazel_itest=warn";

/// Initialize tracing. Call at process startup.
/// `verbose` (VERBOSE_LOGS / --verbose) turns on debug output for every
/// bazel-itest crate; BAZEL_ITEST_QUIET=1 wins over it. RUST_LOG overrides both.
pub fn init_tracing(verbose: bool) {
    let cfg = ObservabilityConfig::from_env();
    let level = filter_directive(&cfg, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn filter_directive(cfg: &ObservabilityConfig, verbose: bool) -> String {
    if cfg.quiet {
        QUIET_LEVEL.to_string()
    } else if verbose {
        VERBOSE_LEVEL.to_string()
    } else {
        cfg.log_level.clone()
    }
}
