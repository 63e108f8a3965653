//! Throwaway projects for driving the CLI

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temp directory standing in for a user project
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Empty project, not initialized
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Project after `tk init`, with a small source tree
    pub fn initialized() -> Result<Self> {
        let project = Self::new()?;
        crate::tk!(project.root(), "init").assert_success()?;
        project.write("src/app.js", "console.log('app');\n")?;
        project.write("src/util.js", "export const x = 1;\n")?;
        project.write("README.md", "# demo\n")?;
        Ok(project)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn remove(&self, rel: &str) -> Result<()> {
        std::fs::remove_file(self.path(rel))?;
        Ok(())
    }

    /// Replace the task list
    pub fn write_tasks(&self, json: &str) -> Result<()> {
        self.write(".tk/tasks.json", json)?;
        Ok(())
    }

    /// Parsed fingerprint store
    pub fn stored_paths(&self) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(self.path(".tk/fingerprints.json"))?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let mut keys: Vec<String> = value
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
