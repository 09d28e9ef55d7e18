use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while planning or installing a compiler cache
#[derive(Error, Debug)]
pub enum AdapterError {
    /// No default compiler names are known for this toolchain family
    #[error("compiler cache not yet adjusted for non-GCC based toolchains (toolchain: {name})")]
    UnsupportedToolchain { name: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Command failed with exit code {exit_code}: {command}\n{output}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        output: String,
    },

    #[error("Cannot create symlink, path already exists: {}", path.display())]
    SymlinkExists { path: PathBuf },

    #[error("Sanity check failed: {0}")]
    SanityCheck(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AdapterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AdapterError::Io {
            path: path.into(),
            source,
        }
    }
}
