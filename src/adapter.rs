//! Compiler cache install adapter
//!
//! Derives a per-toolchain cache directory, exports it through the module
//! environment and, once the cache is installed, points compiler command
//! names in `{installdir}/bin` at the cache binary so the cache is picked up
//! transparently by anything that puts the module on its `PATH`.
//!
//! The adapter never mutates the build configuration: [`initialize`] takes a
//! snapshot and returns an [`AdapterPlan`] describing its changes.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::BuildConfig;
use crate::error::AdapterError;
use crate::options::{OptionCategory, OptionSet, OptionSpec, OptionValue};
use crate::pipeline::{InstallHooks, StageContext};
use crate::runner::probe_command;
use crate::toolchain::ToolchainFamily;

/// Compiler names wrapped for GCC based toolchains
pub const GNU_COMPILER_SYMLINKS: [&str; 5] = ["cc", "c++", "cpp", "gcc", "g++"];

/// Declare the adapter's options on top of the inherited ones
pub fn extra_options(inherited: OptionSet) -> OptionSet {
    let mut options = inherited;
    options.extend([
        OptionSpec::new(
            "ccache_dir_base",
            OptionValue::Str(String::new()),
            "absolute base path for toolchain specific caches",
            OptionCategory::Custom,
        ),
        OptionSpec::new(
            "extra_compiler_symlinks",
            OptionValue::List(Vec::new()),
            "additional compiler names to wrap",
            OptionCategory::Custom,
        ),
    ]);
    options
}

/// Changes the adapter contributes to a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterPlan {
    /// Compiler names to point at the cache binary
    pub symlinks: BTreeSet<String>,

    /// `{ccache_dir_base}/{toolchain.name}-{toolchain.version}`
    pub cache_dir: String,

    /// Final module environment, including the cache directory variable
    pub modextravars: BTreeMap<String, String>,

    pub cache_binary: String,
}

/// Derive the adapter plan from a configuration snapshot
pub fn initialize(config: &BuildConfig) -> Result<AdapterPlan, AdapterError> {
    let mut symlinks: BTreeSet<String> = match config.toolchain.family() {
        ToolchainFamily::Gnu => GNU_COMPILER_SYMLINKS.iter().map(|s| s.to_string()).collect(),
        ToolchainFamily::Other => {
            return Err(AdapterError::UnsupportedToolchain {
                name: config.toolchain.name.clone(),
            })
        }
    };
    symlinks.extend(config.extra_compiler_symlinks.iter().cloned());

    if config.ccache_dir_base.is_empty() {
        return Err(AdapterError::Configuration(
            "base path for cache directory not specified".to_string(),
        ));
    }
    let cache_dir = format!(
        "{}/{}-{}",
        config.ccache_dir_base, config.toolchain.name, config.toolchain.version
    );

    let mut modextravars = config.modextravars.clone();
    modextravars.insert(config.cache_dir_env_var.clone(), cache_dir.clone());

    info!(
        operation = "initialize",
        toolchain = %config.toolchain,
        cache_dir = %cache_dir,
        symlinks = symlinks.len(),
        "derived compiler cache plan"
    );

    Ok(AdapterPlan {
        symlinks,
        cache_dir,
        modextravars,
        cache_binary: config.cache_binary.clone(),
    })
}

impl AdapterPlan {
    pub fn cache_binary_path(&self, installdir: &Path) -> PathBuf {
        installdir.join("bin").join(&self.cache_binary)
    }

    pub fn symlink_path(&self, installdir: &Path, name: &str) -> PathBuf {
        installdir.join("bin").join(name)
    }

    /// Create `{installdir}/bin/{name} -> {installdir}/bin/{cache_binary}`
    /// for every planned name
    ///
    /// Existing entries are never replaced.
    pub fn create_symlinks(&self, installdir: &Path) -> Result<Vec<PathBuf>, AdapterError> {
        let target = self.cache_binary_path(installdir);
        let mut created = Vec::with_capacity(self.symlinks.len());

        for name in &self.symlinks {
            probe_command(name);

            let link = self.symlink_path(installdir, name);
            create_symlink(&target, &link)?;
            info!(
                operation = "symlink",
                status = "success",
                path = %link.display(),
                target = %target.display(),
                "wrapped compiler"
            );
            created.push(link);
        }

        Ok(created)
    }
}

impl InstallHooks for AdapterPlan {
    fn post_install(&self, ctx: &StageContext<'_>) -> Result<(), AdapterError> {
        if ctx.dry_run {
            let target = self.cache_binary_path(ctx.installdir);
            for name in &self.symlinks {
                info!(
                    operation = "symlink",
                    status = "dry_run",
                    path = %self.symlink_path(ctx.installdir, name).display(),
                    target = %target.display(),
                    "would wrap compiler"
                );
            }
            return Ok(());
        }

        self.create_symlinks(ctx.installdir)?;
        Ok(())
    }

    fn sanity_check(&self, ctx: &StageContext<'_>) -> Result<(), AdapterError> {
        for name in &self.symlinks {
            let link = self.symlink_path(ctx.installdir, name);
            let is_link = std::fs::symlink_metadata(&link)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(false);
            if !is_link {
                return Err(AdapterError::SanityCheck(format!(
                    "expected compiler symlink: {}",
                    link.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> Result<(), AdapterError> {
    if std::fs::symlink_metadata(link).is_ok() {
        return Err(AdapterError::SymlinkExists {
            path: link.to_path_buf(),
        });
    }

    std::os::unix::fs::symlink(target, link).map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => AdapterError::SymlinkExists {
            path: link.to_path_buf(),
        },
        _ => AdapterError::io(link, e),
    })
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, link: &Path) -> Result<(), AdapterError> {
    Err(AdapterError::io(
        link,
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "compiler symlinks are only supported on unix",
        ),
    ))
}
