//! Initialize tasklens in a project

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;
use tk_core::DetectConfig;

const IGNORE_TEMPLATE: &str = "\
# Paths tasklens should never report, one pattern per line.
# Built-in defaults (VCS metadata, node_modules, build output, logs, ...)
# always apply in addition to these.
#
#   *         any characters within one path segment
#   **        any characters, crossing directories
#   dir/      a whole directory
#   **/*.ext  a file extension anywhere
#
# generated/
# **/*.snap
";

pub fn run(root: &Path) -> Result<()> {
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    println!("Initializing tasklens at {}", root.display());

    let config = DetectConfig::new(root);
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let mut created = Vec::new();
    let mut kept = Vec::new();

    for (path, contents) in [
        (config.config_path(), config.to_toml()?),
        (config.task_path(), "[]\n".to_string()),
        (config.ignore_path(), IGNORE_TEMPLATE.to_string()),
    ] {
        let display = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .display()
            .to_string();

        if path.exists() {
            kept.push(display);
            continue;
        }
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        created.push(display);
    }

    println!();
    for name in &created {
        println!("  {} {}", "created".green(), name);
    }
    for name in &kept {
        println!("  {} {}", "exists ".dimmed(), name);
    }

    println!();
    if created.is_empty() {
        println!("{}", "Already initialized; nothing to do".dimmed());
    } else {
        println!("Next steps:");
        println!("  - Add tasks with relatedFiles to .tk/tasks.json");
        println!("  - Run 'tk changes' to see what changed");
        println!("  - Run 'tk affected' to see which tasks those changes touch");
    }

    Ok(())
}
