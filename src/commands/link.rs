use anyhow::Result;

use crate::cli::LinkArgs;
use crate::pipeline::Pipeline;

pub fn run(args: LinkArgs) -> Result<()> {
    super::install::run_pipeline(&args.common, Pipeline::post_install_only(), args.dry_run)
}
