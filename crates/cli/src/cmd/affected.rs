//! Show tasks touched by the current changes

use super::changes::print_partial_warning;
use super::DetectArgs;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::Path;
use tk_core::ChangeSet;
use tracker::{match_tasks, AffectedTask, ChangeDetector, Strategy};

#[derive(Serialize)]
struct AffectedReport<'a> {
    strategy: Strategy,
    truncated: bool,
    changes: &'a ChangeSet,
    affected: &'a [AffectedTask],
}

pub fn run(root: &Path, args: &DetectArgs) -> Result<()> {
    let config = util::load_config(root, args)?;
    let tasks = util::load_tasks(&config, true).context("Failed to load tasks")?;
    let request = util::detect_request(args, &tasks)?;
    let policy = config.tasks.match_policy;

    let detector = ChangeDetector::new(config)?;
    let detection = detector.detect(&request)?;
    let affected = match_tasks(&tasks, &detection.changes, policy);

    if args.json {
        let report = AffectedReport {
            strategy: detection.strategy,
            truncated: detection.truncated,
            changes: &detection.changes,
            affected: &affected,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Affected tasks".bold(),
        format!(
            "({} changed, via {})",
            util::plural(detection.changes.len(), "file"),
            detection.strategy
        )
        .dimmed()
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if affected.is_empty() {
        if tasks.is_empty() {
            println!("  {}", "No tasks defined".dimmed());
        } else {
            println!("  {}", "No tasks affected".dimmed());
        }
    }

    for task in &affected {
        let status = if task.status.is_empty() {
            String::new()
        } else {
            format!(" [{}]", task.status)
        };
        println!(
            "  {} {}{}",
            format!("#{}", task.id).yellow(),
            task.title,
            status.dimmed()
        );
        for file in &task.matched_files {
            let kind = detection
                .changes
                .iter()
                .find(|(_, changed)| tracker::paths_match(file, changed, policy))
                .map(|(kind, _)| format!("{:?}", kind).to_lowercase())
                .unwrap_or_default();
            println!("      {} {}", file.cyan(), kind.dimmed());
        }
    }

    print_partial_warning(&detection, detector.config().scan.max_files);
    Ok(())
}
