pub mod config;
pub mod error;
pub mod run_config;
pub mod runfiles;

pub use error::{ItestError, Result};
pub use run_config::RunConfig;
pub use runfiles::{Runfiles, RunfilesIndex};
