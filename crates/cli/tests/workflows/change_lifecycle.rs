//! init -> changes -> edit -> changes, through the real binary

use crate::common::cli::string_list;
use crate::common::TestProject;
use crate::tk;
use anyhow::Result;

#[test]
fn init_creates_project_files_once() -> Result<()> {
    let project = TestProject::new()?;

    let result = tk!(project.root(), "init").assert_success()?;
    assert!(result.contains_stdout("created"));
    assert!(project.path(".tk/config.toml").is_file());
    assert!(project.path(".tk/tasks.json").is_file());
    assert!(project.path(".tkignore").is_file());

    project.write(".tkignore", "custom/\n")?;
    let result = tk!(project.root(), "init").assert_success()?;
    assert!(result.contains_stdout("Already initialized"));
    assert_eq!(std::fs::read_to_string(project.path(".tkignore"))?, "custom/\n");
    Ok(())
}

#[test]
fn changes_lifecycle_json() -> Result<()> {
    let project = TestProject::initialized()?;

    let first = tk!(project.root(), "changes", "--strategy", "fs", "--json")
        .assert_success()?
        .json()?;
    assert_eq!(first["strategy"], "filesystem");
    assert_eq!(first["truncated"], false);
    assert_eq!(
        string_list(&first, "/changes/new"),
        vec![".tkignore", "README.md", "src/app.js", "src/util.js"]
    );

    let quiet = tk!(project.root(), "changes", "--strategy", "fs", "--json")
        .assert_success()?
        .json()?;
    assert!(string_list(&quiet, "/changes/new").is_empty());
    assert!(string_list(&quiet, "/changes/modified").is_empty());
    assert!(string_list(&quiet, "/changes/deleted").is_empty());

    project.write("src/app.js", "console.log('app, now with more');\n")?;
    project.remove("README.md")?;

    let edited = tk!(project.root(), "changes", "--strategy", "fs", "--json")
        .assert_success()?
        .json()?;
    assert_eq!(string_list(&edited, "/changes/modified"), vec!["src/app.js"]);
    assert_eq!(string_list(&edited, "/changes/deleted"), vec!["README.md"]);
    assert!(string_list(&edited, "/changes/new").is_empty());

    assert!(!project.stored_paths()?.contains(&"README.md".to_string()));
    Ok(())
}

#[test]
fn changes_text_output() -> Result<()> {
    let project = TestProject::initialized()?;

    let result = tk!(project.root(), "changes", "--strategy", "fs").assert_success()?;
    assert!(result.contains_stdout("Changes"));
    assert!(result.contains_stdout("filesystem"));
    assert!(result.contains_stdout("src/app.js"));
    assert!(result.contains_stdout("4 new, 0 modified, 0 deleted"));

    let result = tk!(project.root(), "changes", "--strategy", "fs").assert_success()?;
    assert!(result.contains_stdout("No changes"));
    Ok(())
}

#[test]
fn root_found_from_subdirectory() -> Result<()> {
    let project = TestProject::initialized()?;

    let from_src = tk!(project.path("src"), "changes", "--strategy", "fs", "--json")
        .assert_success()?
        .json()?;
    assert!(string_list(&from_src, "/changes/new").contains(&"src/app.js".to_string()));
    assert!(project.path(".tk/fingerprints.json").is_file());
    assert!(!project.path("src/.tk").exists());
    Ok(())
}

#[test]
fn path_filter_is_relative_to_cwd() -> Result<()> {
    let project = TestProject::initialized()?;

    let from_root = tk!(project.root(), "changes", "--strategy", "fs", "--path", "src", "--json")
        .assert_success()?
        .json()?;
    assert_eq!(
        string_list(&from_root, "/changes/new"),
        vec!["src/app.js", "src/util.js"]
    );

    project.write("src/extra.js", "1\n")?;
    let from_src = tk!(project.path("src"), "changes", "--strategy", "fs", "--path", ".", "--json")
        .assert_success()?
        .json()?;
    assert_eq!(string_list(&from_src, "/changes/new"), vec!["src/extra.js"]);
    Ok(())
}

#[test]
fn explicit_root_flag() -> Result<()> {
    let project = TestProject::initialized()?;
    let elsewhere = TestProject::new()?;
    let root = project.root().to_string_lossy().to_string();

    let result = tk!(
        elsewhere.root(),
        "--root",
        root.as_str(),
        "changes",
        "--strategy",
        "fs",
        "--json"
    )
    .assert_success()?
    .json()?;
    assert!(string_list(&result, "/changes/new").contains(&"README.md".to_string()));
    Ok(())
}
