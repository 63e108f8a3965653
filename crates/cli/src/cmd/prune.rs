//! Clean up the fingerprint store

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use tk_core::DetectConfig;
use tracker::ChangeDetector;

pub fn run(root: &Path) -> Result<()> {
    let detector = ChangeDetector::new(DetectConfig::load(root)?)?;
    let report = detector.prune_store()?;

    println!("{}", "Prune Complete".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if report.pruned == 0 && report.repaired == 0 {
        println!("{}", "No stale fingerprints - store is already clean".dimmed());
    } else {
        println!("Missing files dropped:  {}", report.pruned.to_string().yellow());
        println!("Ignored/invalid dropped: {}", report.repaired.to_string().yellow());
    }
    println!("Fingerprints kept:      {}", report.remaining);

    Ok(())
}
