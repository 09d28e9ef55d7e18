use anyhow::{Context, Result};

use crate::adapter;
use crate::cli::EnvArgs;
use crate::merger;
use crate::module_env::ModuleEnv;

pub fn run(args: EnvArgs) -> Result<()> {
    let loaded = merger::load(&args.common)?;
    let config = &loaded.config;
    let plan = adapter::initialize(config).context("Failed to initialize compiler cache adapter")?;

    let description = format!(
        "{} compiler cache for {}",
        config.name, config.toolchain
    );
    let env = ModuleEnv {
        vars: &plan.modextravars,
        installdir: config.installdir.as_deref(),
        description: &description,
    };

    print!("{}", env.render(args.format));
    Ok(())
}
