//! prune / ignore / config

use crate::common::TestProject;
use crate::tk;
use anyhow::Result;

#[test]
fn prune_drops_stale_and_ignored_entries() -> Result<()> {
    let project = TestProject::initialized()?;
    tk!(project.root(), "changes", "--strategy", "fs").assert_success()?;

    // A stale entry for a file that is gone, plus a newly ignored file
    let store_path = project.path(".tk/fingerprints.json");
    let mut store: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path)?)?;
    store["ghost.txt"] = serde_json::json!({ "size": 1, "mtime_ms": 1 });
    std::fs::write(&store_path, serde_json::to_string(&store)?)?;
    project.write(".tkignore", "src/util.js\n")?;

    let result = tk!(project.root(), "prune").assert_success()?;
    assert!(result.contains_stdout("Prune Complete"));

    let stored = project.stored_paths()?;
    assert!(!stored.contains(&"ghost.txt".to_string()));
    assert!(!stored.contains(&"src/util.js".to_string()));
    assert!(stored.contains(&"src/app.js".to_string()));

    let again = tk!(project.root(), "prune").assert_success()?;
    assert!(again.contains_stdout("already clean"));
    Ok(())
}

#[test]
fn changes_with_prune_flag_drops_stale_entries_outside_the_filter() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write(".tk/config.toml", "[store]\nprune_probability = 0.0\n")?;
    project.write(
        ".tk/fingerprints.json",
        r#"{ "docs/ghost.md": { "size": 1, "mtime_ms": 1 } }"#,
    )?;

    // Outside --path the scanner never reports the deletion
    let plain = tk!(project.root(), "changes", "--strategy", "fs", "--path", "src", "--json")
        .assert_success()?
        .json()?;
    assert_eq!(plain["pruned"], 0);
    assert!(project.stored_paths()?.contains(&"docs/ghost.md".to_string()));

    let pruned = tk!(
        project.root(),
        "changes",
        "--strategy",
        "fs",
        "--path",
        "src",
        "--prune",
        "--json"
    )
    .assert_success()?
    .json()?;
    assert_eq!(pruned["pruned"], 1);
    assert!(!project.stored_paths()?.contains(&"docs/ghost.md".to_string()));
    Ok(())
}

#[test]
fn ignore_lists_builtin_and_project_patterns() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write(".tkignore", "# comment\ngenerated/\n")?;

    let result = tk!(project.root(), "ignore").assert_success()?;
    assert!(result.contains_stdout("node_modules/**"));
    assert!(result.contains_stdout("generated/**"));
    assert!(!result.contains_stdout("# comment"));
    Ok(())
}

#[test]
fn config_shows_defaults_and_location() -> Result<()> {
    let project = TestProject::new()?;

    let result = tk!(project.root(), "config").assert_success()?;
    assert!(result.contains_stdout("missing, using defaults"));
    assert!(result.contains_stdout("max_files"));
    assert!(result.contains_stdout("prune_probability"));

    tk!(project.root(), "init").assert_success()?;
    let result = tk!(project.root(), "config").assert_success()?;
    assert!(!result.contains_stdout("missing, using defaults"));
    assert!(result.contains_stdout("config.toml"));
    Ok(())
}

#[test]
fn edited_config_is_honoured() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write(
        ".tk/config.toml",
        "[scan]\nstrategy = \"fs\"\nfingerprint = \"content\"\n",
    )?;

    let first = tk!(project.root(), "changes", "--json").assert_success()?.json()?;
    assert_eq!(first["strategy"], "filesystem");

    let store = std::fs::read_to_string(project.path(".tk/fingerprints.json"))?;
    assert!(store.contains("\"hash\""));
    Ok(())
}
