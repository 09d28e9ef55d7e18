/// Configuration merger: CLI args > Env vars > Config file > Defaults
///
/// Environment variables are already folded into the CLI args by clap, so
/// only the args and the file-backed snapshot need merging here.
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::CommonConfigArgs;
use crate::config::BuildConfig;
use crate::config_discovery::{load_config_with_discovery, LoadedConfig};

/// Apply command line overrides on top of a file configuration
pub fn merge(args: &CommonConfigArgs, file: BuildConfig) -> Result<BuildConfig> {
    let mut config = file;

    if let Some(installdir) = &args.installdir {
        config.installdir = Some(PathBuf::from(installdir));
    }
    if let Some(srcdir) = &args.srcdir {
        config.srcdir = PathBuf::from(srcdir);
    }
    if let Some(base) = &args.ccache_dir_base {
        config.ccache_dir_base = base.clone();
    }
    if let Some(extra) = &args.extra_compiler_symlinks {
        config.extra_compiler_symlinks = extra.clone();
    }
    if let Some(name) = &args.toolchain_name {
        config.toolchain.name = name.clone();
    }
    if let Some(version) = &args.toolchain_version {
        config.toolchain.version = version.clone();
    }
    if args.parallel.is_some() {
        config.parallel = args.parallel;
    }
    for pair in &args.modextravars {
        let (name, value) = pair
            .split_once('=')
            .with_context(|| format!("--modextravar expects NAME=VALUE, got {:?}", pair))?;
        config
            .modextravars
            .insert(name.trim().to_string(), value.to_string());
    }

    Ok(config)
}

/// Load (or discover) the config file, apply overrides and validate
pub fn load(args: &CommonConfigArgs) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    load_from(args, &cwd)
}

pub fn load_from(args: &CommonConfigArgs, cwd: &Path) -> Result<LoadedConfig> {
    let loaded = load_config_with_discovery(args.config.as_deref(), cwd)?;
    let config = merge(args, loaded.config)?;
    config.validate()?;

    Ok(LoadedConfig {
        config,
        path: loaded.path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_overrides_file() {
        let file = BuildConfig {
            ccache_dir_base: "/from/file".to_string(),
            extra_compiler_symlinks: vec!["gfortran".to_string()],
            ..Default::default()
        };
        let args = CommonConfigArgs {
            ccache_dir_base: Some("/from/cli".to_string()),
            toolchain_name: Some("GCCcore".to_string()),
            modextravars: vec!["FOO=bar=baz".to_string()],
            ..Default::default()
        };

        let config = merge(&args, file).unwrap();

        assert_eq!(config.ccache_dir_base, "/from/cli");
        assert_eq!(config.extra_compiler_symlinks, vec!["gfortran".to_string()]);
        assert_eq!(config.toolchain.name, "GCCcore");
        assert_eq!(config.modextravars.get("FOO").map(String::as_str), Some("bar=baz"));
    }

    #[test]
    fn test_malformed_modextravar_rejected() {
        let args = CommonConfigArgs {
            modextravars: vec!["NOVALUE".to_string()],
            ..Default::default()
        };
        assert!(merge(&args, BuildConfig::default()).is_err());
    }

    #[test]
    fn test_modextravar_with_invalid_name_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let args = CommonConfigArgs {
            modextravars: vec!["A B=x".to_string()],
            ..Default::default()
        };

        let err = load_from(&args, temp.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("modextravars"));
    }

    #[test]
    fn test_load_from_discovers_and_validates() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("cachewrap.toml"),
            "installdir = \"relative\"\n",
        )
        .unwrap();

        let args = CommonConfigArgs::default();
        assert!(load_from(&args, temp.path()).is_err());

        let args = CommonConfigArgs {
            installdir: Some("/opt/ccache".to_string()),
            ..Default::default()
        };
        let loaded = load_from(&args, temp.path()).unwrap();
        assert_eq!(loaded.config.installdir, Some(PathBuf::from("/opt/ccache")));
        assert!(loaded.path.is_some());
    }
}
