pub mod config;
pub mod env;
pub mod install;
pub mod link;
pub mod options;
pub mod plan;
pub mod status;
