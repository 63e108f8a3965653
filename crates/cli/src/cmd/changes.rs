//! Show changed files since the last check

use super::DetectArgs;
use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tracker::{ChangeDetector, Detection};

pub fn run(root: &Path, args: &DetectArgs) -> Result<()> {
    let config = util::load_config(root, args)?;
    let tasks = util::load_tasks(&config, false)?;
    let request = util::detect_request(args, &tasks)?;

    let detector = ChangeDetector::new(config)?;
    let detection = detector.detect(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detection)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Changes".bold(),
        format!("(via {})", detection.strategy).dimmed()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    print_changes(&detection);
    print_partial_warning(&detection, detector.config().scan.max_files);

    Ok(())
}

/// The three change lists, or a note when there are none
pub fn print_changes(detection: &Detection) {
    let changes = &detection.changes;
    if changes.is_empty() {
        println!("  {}", "No changes".dimmed());
        return;
    }

    for path in &changes.new {
        println!("  {}      {}", "new:".green(), path);
    }
    for path in &changes.modified {
        println!("  {} {}", "modified:".yellow(), path);
    }
    for path in &changes.deleted {
        println!("  {}  {}", "deleted:".red(), path);
    }

    println!();
    println!(
        "{} new, {} modified, {} deleted",
        changes.new.len(),
        changes.modified.len(),
        changes.deleted.len()
    );
}

pub fn print_partial_warning(detection: &Detection, max_files: usize) {
    if !detection.truncated {
        return;
    }

    println!();
    println!(
        "{}",
        format!(
            "Warning: stopped after {}; results are partial",
            util::plural(max_files, "file")
        )
        .yellow()
    );
    println!(
        "{}",
        "Tip: raise scan.max_files in .tk/config.toml or pass --max-files".dimmed()
    );
}
