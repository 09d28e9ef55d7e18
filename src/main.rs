use anyhow::Result;
use clap::Parser;

use cachewrap::cli::{Cli, Commands};
use cachewrap::{commands, logging};

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Options(args) => commands::options::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Install(args) => commands::install::run(args),
        Commands::Link(args) => commands::link::run(args),
        Commands::Env(args) => commands::env::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::Config(args) => commands::config::run(args.command),
    }
}
