use anyhow::{Context, Result};

use crate::adapter;
use crate::cli::PlanArgs;
use crate::merger;

pub fn run(args: PlanArgs) -> Result<()> {
    let loaded = merger::load(&args.common)?;
    let config = &loaded.config;
    let plan = adapter::initialize(config).context("Failed to initialize compiler cache adapter")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Toolchain:    {}", config.toolchain);
    println!("Cache dir:    {}", plan.cache_dir);
    println!("Cache binary: {}", plan.cache_binary);
    println!("Symlinks:");
    for name in &plan.symlinks {
        match config.installdir.as_deref() {
            Some(installdir) => println!(
                "  {} -> {}",
                plan.symlink_path(installdir, name).display(),
                plan.cache_binary_path(installdir).display()
            ),
            None => println!("  {}", name),
        }
    }
    println!("Module environment:");
    for (name, value) in &plan.modextravars {
        println!("  {}={}", name, value);
    }

    Ok(())
}
