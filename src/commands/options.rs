use anyhow::Result;

use crate::adapter::extra_options;
use crate::cli::OptionsArgs;
use crate::options::{configure_make_options, OptionCategory};

pub fn run(args: OptionsArgs) -> Result<()> {
    let options = extra_options(configure_make_options());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    for category in [
        OptionCategory::Mandatory,
        OptionCategory::Custom,
        OptionCategory::Build,
        OptionCategory::Module,
    ] {
        let mut specs = options.iter().filter(|s| s.category == category).peekable();
        if specs.peek().is_none() {
            continue;
        }

        println!("{} options:", category);
        for spec in specs {
            println!("  {:<26} {} (default: {})", spec.name, spec.help, spec.default);
        }
        println!();
    }

    Ok(())
}
