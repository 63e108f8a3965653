//! Git integration for change detection
//!
//! This crate provides:
//! - `GitProbe`, the boundary to version control (process-backed by
//!   default, swappable in tests)
//! - `GitExtractor`, which turns `git status --porcelain` output into a
//!   root-relative `ChangeSet`

pub mod probe;
pub mod status;

pub use probe::{CommandProbe, GitProbe};
pub use status::{parse_porcelain, GitExtractor, StatusEntry};
