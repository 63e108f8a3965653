//! List active ignore patterns

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tk_core::DetectConfig;
use watcher::PatternMatcher;

pub fn run(root: &Path) -> Result<()> {
    let config = DetectConfig::load(root)?;
    let matcher = PatternMatcher::load(&config);
    let ignore_path = config.ignore_path();

    println!("{}", "Built-in patterns".bold());
    for pattern in matcher.builtin_patterns() {
        println!("  {}", pattern.as_str().dimmed());
    }

    println!();
    println!(
        "{} {}",
        "Project patterns".bold(),
        format!("({})", ignore_path.display()).dimmed()
    );
    if matcher.user_patterns().is_empty() {
        if ignore_path.exists() {
            println!("  {}", "none".dimmed());
        } else {
            println!("  {}", "no ignore file; run 'tk init' to create one".dimmed());
        }
    }
    for pattern in matcher.user_patterns() {
        println!("  {}", pattern.as_str().cyan());
    }

    Ok(())
}
