use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::adapter::GNU_COMPILER_SYMLINKS;
use crate::toolchain::Toolchain;

/// Build configuration snapshot (loaded from cachewrap.toml)
///
/// Loaded once before the adapter runs and never mutated afterwards; the
/// adapter derives its changes as an explicit [`crate::adapter::AdapterPlan`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Software name (used in the build record)
    pub name: String,

    /// Software version
    pub version: String,

    /// Installation prefix; symlinks are created in `{installdir}/bin`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installdir: Option<PathBuf>,

    /// Unpacked source tree the configure/make commands run in
    pub srcdir: PathBuf,

    /// Name of the installed cache executable in `{installdir}/bin`
    pub cache_binary: String,

    /// Environment variable that points the cache at its directory
    pub cache_dir_env_var: String,

    /// Absolute base path for toolchain specific caches
    pub ccache_dir_base: String,

    /// Additional compiler names to wrap
    pub extra_compiler_symlinks: Vec<String>,

    /// Extra environment variables to be set by the generated module
    pub modextravars: BTreeMap<String, String>,

    pub preconfigopts: String,
    pub configopts: String,
    pub configure_cmd: String,
    pub prefix_opt: String,
    pub prebuildopts: String,
    pub buildopts: String,
    pub build_cmd: String,

    /// Parallel build jobs (passed as `-j N` to the build command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<u32>,

    pub preinstallopts: String,
    pub installopts: String,
    pub install_cmd: String,

    /// Toolchain the cache is installed for
    pub toolchain: Toolchain,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            name: "ccache".to_string(),
            version: String::new(),
            installdir: None,
            srcdir: PathBuf::from("."),
            cache_binary: "ccache".to_string(),
            cache_dir_env_var: "CCACHE_DIR".to_string(),
            ccache_dir_base: String::new(),
            extra_compiler_symlinks: Vec::new(),
            modextravars: BTreeMap::new(),
            preconfigopts: String::new(),
            configopts: String::new(),
            configure_cmd: "./configure".to_string(),
            prefix_opt: "--prefix=".to_string(),
            prebuildopts: String::new(),
            buildopts: String::new(),
            build_cmd: "make".to_string(),
            parallel: None,
            preinstallopts: String::new(),
            installopts: String::new(),
            install_cmd: "make install".to_string(),
            toolchain: Toolchain::default(),
        }
    }
}

impl BuildConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Installation directory, required by every stage that touches the filesystem
    pub fn require_installdir(&self) -> Result<&Path> {
        self.installdir
            .as_deref()
            .context("installdir must be set (config file or --installdir)")
    }

    /// Generate example configuration as TOML string
    pub fn example() -> String {
        let mut modextravars = BTreeMap::new();
        modextravars.insert("CCACHE_MAXSIZE".to_string(), "20G".to_string());

        let config = BuildConfig {
            version: "4.9.1".to_string(),
            installdir: Some(PathBuf::from("/opt/software/ccache/4.9.1-GCC-12.3.0")),
            ccache_dir_base: "/scratch/ccache".to_string(),
            extra_compiler_symlinks: vec!["gfortran".to_string()],
            modextravars,
            toolchain: Toolchain::new("GCC", "12.3.0"),
            ..Default::default()
        };

        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validate configuration
    ///
    /// An empty `ccache_dir_base` passes; it is reported by
    /// [`crate::adapter::initialize`] as a configuration error.
    pub fn validate(&self) -> Result<()> {
        if let Some(installdir) = &self.installdir {
            if !installdir.is_absolute() {
                anyhow::bail!("installdir must be an absolute path: {}", installdir.display());
            }
        }

        if !self.ccache_dir_base.is_empty() && !self.ccache_dir_base.starts_with('/') {
            anyhow::bail!(
                "ccache_dir_base must be an absolute path: {}",
                self.ccache_dir_base
            );
        }

        if self.cache_binary.is_empty() || self.cache_binary.contains('/') {
            anyhow::bail!("cache_binary must be a plain file name: {:?}", self.cache_binary);
        }

        if GNU_COMPILER_SYMLINKS.contains(&self.cache_binary.as_str()) {
            anyhow::bail!("cannot wrap the cache binary itself: {}", self.cache_binary);
        }

        if !is_env_var_name(&self.cache_dir_env_var) {
            anyhow::bail!(
                "cache_dir_env_var must be a valid environment variable name: {:?}",
                self.cache_dir_env_var
            );
        }

        for name in self.modextravars.keys() {
            if !is_env_var_name(name) {
                anyhow::bail!(
                    "modextravars keys must be valid environment variable names: {:?}",
                    name
                );
            }
        }

        if self.parallel == Some(0) {
            anyhow::bail!("parallel must be at least 1");
        }

        for name in &self.extra_compiler_symlinks {
            if name.is_empty() || name.contains('/') || name == "." || name == ".." {
                anyhow::bail!(
                    "extra_compiler_symlinks must contain plain command names: {:?}",
                    name
                );
            }
            if *name == self.cache_binary {
                anyhow::bail!("cannot wrap the cache binary itself: {}", name);
            }
        }

        Ok(())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the names a shell or modulefile can set verbatim
pub fn is_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
