use anyhow::{Context, Result};

use crate::adapter;
use crate::cli::{CommonConfigArgs, InstallArgs};
use crate::cli_utils::{print_summary, run_summary};
use crate::merger;
use crate::pipeline::{Pipeline, StageContext};
use crate::record::BuildRecord;
use crate::runner::{CommandRunner, DryRunRunner, ShellRunner};

pub fn run(args: InstallArgs) -> Result<()> {
    run_pipeline(&args.common, Pipeline::configure_make(), args.dry_run)
}

/// Initialize the adapter and drive `pipeline` with it
pub(crate) fn run_pipeline(
    common: &CommonConfigArgs,
    pipeline: Pipeline,
    dry_run: bool,
) -> Result<()> {
    let loaded = merger::load(common)?;
    let config = &loaded.config;
    let plan = adapter::initialize(config).context("Failed to initialize compiler cache adapter")?;
    let installdir = config.require_installdir()?;

    let runner: &dyn CommandRunner = if dry_run { &DryRunRunner } else { &ShellRunner };
    let ctx = StageContext {
        config,
        installdir,
        runner,
        dry_run,
    };

    let state = pipeline
        .run(&ctx, &plan)
        .with_context(|| format!("Build of {} failed", installdir.display()))?;

    let summary = run_summary(&plan, installdir, &config.cache_dir_env_var, dry_run);
    if dry_run {
        print_summary(&summary);
        return Ok(());
    }

    let record = BuildRecord::new(config, &plan, installdir, loaded.hash()?, state);
    let record_path = record.save()?;
    tracing::debug!(path = %record_path.display(), "saved build record");

    print_summary(&summary);

    Ok(())
}
