use anyhow::Result;

use crate::cli::StatusArgs;
use crate::merger;
use crate::record::BuildRecord;

pub fn run(args: StatusArgs) -> Result<()> {
    let loaded = merger::load(&args.common)?;
    let installdir = loaded.config.require_installdir()?;

    let Some(record) = BuildRecord::load(installdir)? else {
        println!("No build record found in {}", installdir.display());
        std::process::exit(1);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Software:   {} {}", record.software, record.version);
    println!("Toolchain:  {}", record.toolchain);
    println!("Installdir: {}", record.installdir.display());
    println!("State:      {}", record.state);
    println!("Finished:   {}", record.finished_at.to_rfc3339());
    println!("Cache dir:  {}", record.cache_dir);
    if let Some(hash) = &record.config_hash {
        println!("Config:     {}", hash);
    }

    let symlinks: Vec<&str> = record.symlinks.iter().map(String::as_str).collect();
    println!("Symlinks:   {}", symlinks.join(", "));

    Ok(())
}
