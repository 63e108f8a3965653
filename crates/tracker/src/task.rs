//! Task model, read-only from this crate's point of view

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Task identifier as written in the task file (number or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub status: String,

    /// Paths the task touches, as the author wrote them
    #[serde(default, rename = "relatedFiles")]
    pub related_files: Vec<String>,
}

/// Anything that can hand over the current task list
pub trait TaskSource {
    fn load_tasks(&self) -> Result<Vec<Task>>;
}

impl TaskSource for Vec<Task> {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.clone())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskFile {
    List(Vec<Task>),
    Wrapped { tasks: Vec<Task> },
}

/// Tasks stored as JSON: a bare array or `{ "tasks": [...] }`
#[derive(Debug, Clone)]
pub struct JsonTaskSource {
    path: PathBuf,
}

impl JsonTaskSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskSource for JsonTaskSource {
    fn load_tasks(&self) -> Result<Vec<Task>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let file: TaskFile = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse tasks from {}", self.path.display()))?;

        Ok(match file {
            TaskFile::List(tasks) => tasks,
            TaskFile::Wrapped { tasks } => tasks,
        })
    }
}
