//! Version-control probe
//!
//! Everything the detector needs from git goes through `GitProbe`, so the
//! external binary can be replaced by a library binding or a test double.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

pub trait GitProbe {
    /// True if `root` is inside a git work tree
    ///
    /// Any failure of the probe itself (git not installed, not a repo)
    /// reads as `false`.
    fn is_work_tree(&self, root: &Path) -> bool;

    /// Path of `root` relative to the repository top level, with a
    /// trailing `/` (empty at the top level)
    fn show_prefix(&self, root: &Path) -> Result<String>;

    /// Raw `git status --porcelain` output for the repository
    fn status_porcelain(&self, root: &Path) -> Result<String>;
}

/// Probe that shells out to the `git` binary
#[derive(Debug, Clone)]
pub struct CommandProbe {
    binary: PathBuf,
}

impl CommandProbe {
    pub fn new() -> Self {
        Self::with_binary("git")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn run(&self, root: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(root)
            .output()
            .with_context(|| format!("Failed to run {}", self.binary.display()))?;

        if !output.status.success() {
            anyhow::bail!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout).context("git produced non-UTF-8 output")
    }
}

impl Default for CommandProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProbe for CommandProbe {
    fn is_work_tree(&self, root: &Path) -> bool {
        match self.run(root, &["rev-parse", "--is-inside-work-tree"]) {
            Ok(out) => out.trim() == "true",
            Err(e) => {
                debug!("Not a git work tree ({}): {:#}", root.display(), e);
                false
            }
        }
    }

    fn show_prefix(&self, root: &Path) -> Result<String> {
        let out = self.run(root, &["rev-parse", "--show-prefix"])?;
        Ok(out.trim_end_matches(['\n', '\r']).to_string())
    }

    fn status_porcelain(&self, root: &Path) -> Result<String> {
        self.run(
            root,
            &[
                "-c",
                "core.quotePath=false",
                "status",
                "--porcelain",
                "--untracked-files=all",
            ],
        )
    }
}
