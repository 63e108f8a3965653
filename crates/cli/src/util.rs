//! Shared utilities for CLI commands

use crate::cmd::DetectArgs;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tk_core::config::DATA_DIR_NAME;
use tk_core::DetectConfig;
use tracing::warn;
use tracker::{priority_dirs, DetectRequest, JsonTaskSource, Task, TaskSource};

/// Project root for every command except `init`
///
/// `--root` wins; otherwise the nearest ancestor of the current directory
/// holding `.tk/`; otherwise the current directory itself.
pub fn project_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(canonical_or_raw(root));
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let cwd = canonical_or_raw(cwd);
    Ok(find_project_root(&cwd).unwrap_or(cwd))
}

/// `init` never walks up: it sets up the directory it is pointed at
pub fn init_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(root) => Ok(canonical_or_raw(root)),
        None => Ok(canonical_or_raw(
            std::env::current_dir().context("Failed to get current directory")?,
        )),
    }
}

/// Walk up from `start` to the first directory containing `.tk/`
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(DATA_DIR_NAME).is_dir())
        .map(Path::to_path_buf)
}

/// Load the project config and apply command-line overrides
pub fn load_config(root: &Path, args: &DetectArgs) -> Result<DetectConfig> {
    let mut config = DetectConfig::load(root)?;
    if let Some(strategy) = args.strategy {
        config.scan.strategy = strategy.into();
    }
    if let Some(max_files) = args.max_files {
        config.scan.max_files = max_files;
    }
    Ok(config)
}

/// Tasks from the configured task file
///
/// `required` decides whether a broken task file is an error or just a
/// warning (detection alone can run without tasks).
pub fn load_tasks(config: &DetectConfig, required: bool) -> Result<Vec<Task>> {
    let source = JsonTaskSource::new(config.task_path());
    match source.load_tasks() {
        Ok(tasks) => Ok(tasks),
        Err(e) if !required => {
            warn!("{:#}; scanning without task priorities", e);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Build the detection request; `--path` is taken relative to the cwd
pub fn detect_request(args: &DetectArgs, tasks: &[Task]) -> Result<DetectRequest> {
    let path_filter = match &args.path {
        Some(path) if path.is_absolute() => Some(canonical_or_raw(path.clone())),
        Some(path) => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Some(canonical_or_raw(cwd.join(path)))
        }
        None => None,
    };

    Ok(DetectRequest {
        path_filter,
        priority_dirs: priority_dirs(tasks),
        force_prune: args.prune,
    })
}

/// Canonicalize when the path exists so it lines up with the root
fn canonical_or_raw(path: PathBuf) -> PathBuf {
    std::fs::canonicalize(&path).unwrap_or(path)
}

/// "1 file" / "3 files"
pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}
