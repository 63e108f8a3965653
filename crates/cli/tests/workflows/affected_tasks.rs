//! `tk affected`: changes correlated with the task list

use crate::common::TestProject;
use crate::tk;
use anyhow::Result;

const TASKS: &str = r#"{
  "tasks": [
    { "id": 1, "title": "App shell", "status": "in-progress", "relatedFiles": ["src/app.js"] },
    { "id": 2, "title": "Write guide", "status": "pending", "relatedFiles": ["docs/guide.md"] },
    { "id": "T-3", "title": "Helpers", "status": "pending", "relatedFiles": ["./src/util.js", ""] }
  ]
}"#;

#[test]
fn affected_json_reports_matched_subset() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write_tasks(TASKS)?;
    tk!(project.root(), "changes", "--strategy", "fs").assert_success()?;

    project.write("src/app.js", "console.log('edited app');\n")?;

    let report = tk!(project.root(), "affected", "--strategy", "fs", "--json")
        .assert_success()?
        .json()?;
    let affected = report["affected"].as_array().cloned().unwrap_or_default();

    assert_eq!(affected.len(), 1);
    assert_eq!(affected[0]["id"], 1);
    assert_eq!(affected[0]["title"], "App shell");
    assert_eq!(affected[0]["matchedFiles"], serde_json::json!(["src/app.js"]));
    Ok(())
}

#[test]
fn affected_text_output_and_suffix_match() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write_tasks(TASKS)?;
    tk!(project.root(), "changes", "--strategy", "fs").assert_success()?;

    project.write("src/util.js", "export const x = 42;\n")?;

    let result = tk!(project.root(), "affected", "--strategy", "fs").assert_success()?;
    assert!(result.contains_stdout("#T-3"));
    assert!(result.contains_stdout("Helpers"));
    assert!(result.contains_stdout("./src/util.js"));
    assert!(!result.contains_stdout("App shell"));
    Ok(())
}

#[test]
fn no_tasks_defined() -> Result<()> {
    let project = TestProject::initialized()?;

    let result = tk!(project.root(), "affected", "--strategy", "fs").assert_success()?;
    assert!(result.contains_stdout("No tasks defined"));
    Ok(())
}

#[test]
fn malformed_task_file_fails_affected_but_not_changes() -> Result<()> {
    let project = TestProject::initialized()?;
    project.write_tasks("{ broken")?;

    let result = tk!(project.root(), "affected", "--strategy", "fs").assert_failure()?;
    assert!(result.contains_stderr("Failed to load tasks"));

    tk!(project.root(), "changes", "--strategy", "fs").assert_success()?;
    Ok(())
}
