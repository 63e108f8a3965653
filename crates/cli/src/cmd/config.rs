//! Show the effective configuration

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tk_core::DetectConfig;

pub fn run(root: &Path) -> Result<()> {
    let config = DetectConfig::load(root)?;
    let config_path = config.config_path();

    println!("{}", "Configuration".bold());
    println!("{}: {}", "Root".dimmed(), root.display());
    if config_path.exists() {
        println!("{}: {}", "Location".dimmed(), config_path.display());
    } else {
        println!(
            "{}: {} {}",
            "Location".dimmed(),
            config_path.display(),
            "(missing, using defaults)".yellow()
        );
    }
    println!();

    print!("{}", config.to_toml()?);

    println!();
    println!("{}", "Derived paths:".bold());
    println!("  store:  {}", config.store_path().display());
    println!("  tasks:  {}", config.task_path().display());
    println!("  ignore: {}", config.ignore_path().display());

    Ok(())
}
