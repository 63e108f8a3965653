//! Change detection and task association
//!
//! This crate provides:
//! - The task model consumed from the task store
//! - `ChangeDetector`, which picks git or the filesystem scanner, filters
//!   through the ignore patterns, and keeps the fingerprint store current
//! - Correlation of changed files with tasks' related files

pub mod association;
pub mod detector;
pub mod task;

// Re-exports
pub use association::{match_tasks, paths_match, priority_dirs, AffectedTask};
pub use detector::{ChangeDetector, DetectRequest, Detection, PruneReport, Strategy};
pub use task::{JsonTaskSource, Task, TaskId, TaskSource};
