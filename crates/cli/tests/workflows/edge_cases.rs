//! Failure modes and degraded results

use crate::common::cli::string_list;
use crate::common::TestProject;
use crate::tk;
use anyhow::Result;

#[test]
fn missing_path_filter_fails_without_touching_store() -> Result<()> {
    let project = TestProject::initialized()?;

    let result = tk!(project.root(), "changes", "--strategy", "fs", "--path", "nope")
        .assert_failure()?;
    assert!(result.contains_stderr("does not exist"));
    assert!(!project.path(".tk/fingerprints.json").exists());
    Ok(())
}

#[test]
fn missing_root_fails() -> Result<()> {
    let project = TestProject::new()?;
    let missing = project.path("gone").to_string_lossy().to_string();

    tk!(project.root(), "--root", missing.as_str(), "changes").assert_failure()?;
    assert!(!project.path("gone").exists());
    Ok(())
}

#[test]
fn ceiling_reports_partial_results() -> Result<()> {
    let project = TestProject::new()?;
    for i in 0..60 {
        project.write(&format!("many/f{:03}.txt", i), "x")?;
    }

    let partial = tk!(project.root(), "changes", "--strategy", "fs", "--max-files", "10", "--json")
        .assert_success()?
        .json()?;
    assert_eq!(partial["truncated"], true);
    assert_eq!(string_list(&partial, "/changes/new").len(), 10);

    let text = tk!(project.root(), "changes", "--strategy", "fs", "--max-files", "10")
        .assert_success()?;
    assert!(text.contains_stdout("results are partial"));

    let rest = tk!(project.root(), "changes", "--strategy", "fs", "--max-files", "1000", "--json")
        .assert_success()?
        .json()?;
    assert_eq!(rest["truncated"], false);
    assert_eq!(string_list(&rest, "/changes/new").len(), 50);
    Ok(())
}

#[test]
fn zero_ceiling_is_a_config_error() -> Result<()> {
    let project = TestProject::new()?;
    let result = tk!(project.root(), "changes", "--max-files", "0").assert_failure()?;
    assert!(result.contains_stderr("max_files"));
    Ok(())
}

#[test]
fn corrupt_store_starts_over() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write(".tk/fingerprints.json", "{ this is not json")?;

    let result = tk!(project.root(), "changes", "--strategy", "fs", "--json").assert_success()?;
    assert!(result.contains_stderr("starting from an empty fingerprint store"));
    assert_eq!(string_list(&result.json()?, "/changes/new").len(), 4);
    assert!(project.stored_paths()?.contains(&"src/app.js".to_string()));
    Ok(())
}

#[test]
fn ignored_paths_never_reported() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write(".tkignore", "build/\n*.tmp\n")?;
    project.write("build/out.txt", "artifact")?;
    project.write("notes.tmp", "scratch")?;
    project.write("node_modules/left-pad/index.js", "module.exports = 1;")?;

    let result = tk!(project.root(), "changes", "--strategy", "fs", "--json")
        .assert_success()?
        .json()?;
    let new = string_list(&result, "/changes/new");
    assert!(!new.iter().any(|p| p.starts_with("build/")));
    assert!(!new.contains(&"notes.tmp".to_string()));
    assert!(!new.iter().any(|p| p.contains("node_modules")));

    let stored = project.stored_paths()?;
    assert!(!stored.iter().any(|p| p.starts_with("build/") || p.ends_with(".tmp")));
    Ok(())
}
