// Library interface for cachewrap
// The binary and the integration tests both go through these modules

pub mod adapter;
pub mod cli;
pub mod cli_utils;
pub mod commands;
pub mod config;
pub mod config_discovery;
pub mod error;
pub mod logging;
pub mod merger;
pub mod module_env;
pub mod options;
pub mod pipeline;
pub mod record;
pub mod runner;
pub mod toolchain;

// Re-export commonly used types
pub use adapter::{extra_options, initialize, AdapterPlan};
pub use config::BuildConfig;
pub use error::AdapterError;
pub use pipeline::{BuildState, InstallHooks, Pipeline, StageContext};
pub use toolchain::Toolchain;
