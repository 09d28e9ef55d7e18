use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BuildConfig;

pub const CONFIG_FILE_NAME: &str = "cachewrap.toml";

/// Discovers cachewrap configuration by traversing up the directory tree
pub fn discover_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Ok(Some(config_path));
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    // Fallback to global config
    if let Some(home) = dirs::home_dir() {
        let global_config = home.join(".config/cachewrap/config.toml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// Computes a short hash of the configuration file, recorded with each build
pub fn hash_config(config_path: &Path) -> Result<String> {
    let content = fs::read(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let digest = Sha256::digest(&content);
    Ok(hex::encode(digest)[..16].to_string())
}

/// Configuration file picked for a run
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: BuildConfig,
    /// `None` when running on defaults
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    pub fn hash(&self) -> Result<Option<String>> {
        self.path.as_deref().map(hash_config).transpose()
    }
}

/// Loads configuration with auto-discovery support
///
/// If `explicit_path` is provided, loads config from that path.
/// Otherwise, auto-discovers config by traversing up from `cwd`, falling back
/// to defaults when nothing is found.
pub fn load_config_with_discovery(explicit_path: Option<&str>, cwd: &Path) -> Result<LoadedConfig> {
    let path = match explicit_path {
        Some(path) => Some(PathBuf::from(path)),
        None => discover_config(cwd)?,
    };

    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "using config");
            Ok(LoadedConfig {
                config: BuildConfig::from_file(&path)?,
                path: Some(path),
            })
        }
        None => {
            tracing::warn!("no configuration file found, using defaults");
            Ok(LoadedConfig {
                config: BuildConfig::default(),
                path: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_config_finds_nearest() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        let project = root.join("project");
        let subdir = project.join("subdir");
        fs::create_dir_all(&subdir).unwrap();

        let config_path = project.join(CONFIG_FILE_NAME);
        fs::write(&config_path, "# test config").unwrap();

        let found = discover_config(&subdir).unwrap();
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_hash_config_is_consistent() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "ccache_dir_base = \"/tmp/cache\"").unwrap();

        let hash1 = hash_config(&config_path).unwrap();
        let hash2 = hash_config(&config_path).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 16);
    }

    #[test]
    fn test_explicit_path_wins() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("other.toml");
        fs::write(&explicit, "ccache_dir_base = \"/explicit\"").unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "ccache_dir_base = \"/discovered\"",
        )
        .unwrap();

        let loaded =
            load_config_with_discovery(explicit.to_str(), temp.path()).unwrap();

        assert_eq!(loaded.config.ccache_dir_base, "/explicit");
        assert_eq!(loaded.path, Some(explicit));
        assert!(loaded.hash().unwrap().is_some());
    }
}
