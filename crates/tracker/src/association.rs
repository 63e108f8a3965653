//! Correlate changed files with tasks' related files
//!
//! Task authors record paths loosely (`./src/app.js`, `src/app.js`,
//! `project/src/app.js`), so two paths match when they are equal or one
//! ends with the other.

use crate::task::{Task, TaskId};
use ahash::AHashSet;
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;
use tk_core::store::normalize_path;
use tk_core::{ChangeSet, MatchPolicy};

/// A task touched by the current changes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffectedTask {
    pub id: TaskId,
    pub title: String,
    pub status: String,

    /// The task's related files that matched a changed path, in the
    /// task's own order
    #[serde(rename = "matchedFiles")]
    pub matched_files: Vec<String>,
}

/// Whether a task-declared path and a changed path name the same file
pub fn paths_match(declared: &str, changed: &str, policy: MatchPolicy) -> bool {
    let declared = unify_separators(declared.trim());
    let changed = unify_separators(changed);
    if declared.is_empty() || changed.is_empty() {
        return false;
    }

    if declared == changed {
        return true;
    }

    let (long, short) = if declared.len() >= changed.len() {
        (&*declared, &*changed)
    } else {
        (&*changed, &*declared)
    };

    if !long.ends_with(short) {
        return false;
    }

    match policy {
        MatchPolicy::Suffix => true,
        MatchPolicy::Segment => {
            let boundary = long.len() - short.len();
            short.starts_with('/') || long.as_bytes()[boundary - 1] == b'/'
        }
    }
}

/// Tasks with at least one related file among the changed paths
///
/// Output follows the order of `tasks`.
pub fn match_tasks(tasks: &[Task], changes: &ChangeSet, policy: MatchPolicy) -> Vec<AffectedTask> {
    let changed: Vec<&str> = changes.paths().collect();
    if changed.is_empty() {
        return Vec::new();
    }

    let mut affected = Vec::new();
    for task in tasks {
        if task.related_files.is_empty() {
            continue;
        }

        let mut seen = AHashSet::new();
        let matched_files: Vec<String> = task
            .related_files
            .iter()
            .filter(|declared| changed.iter().any(|c| paths_match(declared, c, policy)))
            .filter(|declared| seen.insert(declared.as_str()))
            .cloned()
            .collect();

        if !matched_files.is_empty() {
            affected.push(AffectedTask {
                id: task.id.clone(),
                title: task.title.clone(),
                status: task.status.clone(),
                matched_files,
            });
        }
    }

    affected
}

/// Directories referenced by tasks' related files, in first-seen order
///
/// Used to scan the places tasks care about before the rest of the tree.
pub fn priority_dirs(tasks: &[Task]) -> Vec<String> {
    let mut dirs: Vec<String> = Vec::new();
    for declared in tasks.iter().flat_map(|t| t.related_files.iter()) {
        let unified = unify_separators(declared.trim());
        let Some(rel) = normalize_path(Path::new(&*unified)) else {
            continue;
        };
        let Some((dir, _)) = rel.rsplit_once('/') else {
            continue;
        };
        if !dirs.iter().any(|d| d == dir) {
            dirs.push(dir.to_string());
        }
    }
    dirs
}

fn unify_separators(path: &str) -> Cow<'_, str> {
    if path.contains('\\') {
        Cow::Owned(path.replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    }
}
