use anyhow::Result;
use tracing::info;

use crate::cli::{CommonConfigArgs, ConfigCommands};
use crate::config::BuildConfig;
use crate::merger;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Validate { path } => validate(&path),
        ConfigCommands::Generate => generate(),
        ConfigCommands::Show { common } => show(&common),
    }
}

fn validate(path: &str) -> Result<()> {
    info!("Validating config file: {}", path);

    let config = BuildConfig::from_file(path)?;
    config.validate()?;

    println!("✓ Configuration file is valid: {}", path);
    println!("\nSummary:");
    println!("  - Toolchain: {}", config.toolchain);
    match &config.installdir {
        Some(dir) => println!("  - Install directory: {}", dir.display()),
        None => println!("  - Install directory: (not set)"),
    }
    if config.ccache_dir_base.is_empty() {
        println!("  - Cache base: (not set, required for planning)");
    } else {
        println!("  - Cache base: {}", config.ccache_dir_base);
    }
    println!(
        "  - Extra compiler symlinks: {}",
        config.extra_compiler_symlinks.len()
    );

    Ok(())
}

fn generate() -> Result<()> {
    println!("{}", BuildConfig::example());
    Ok(())
}

fn show(common: &CommonConfigArgs) -> Result<()> {
    info!("Showing effective configuration");

    let loaded = merger::load(common)?;

    println!("Effective Configuration:\n");
    println!("{}", toml::to_string_pretty(&loaded.config)?);

    Ok(())
}
