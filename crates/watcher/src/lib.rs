//! Filesystem side of change detection
//!
//! This crate provides:
//! - The ignore-pattern matcher (built-in defaults + `.tkignore`)
//! - A bounded, pruning directory scanner that classifies files as
//!   new/modified/deleted against the fingerprint store

pub mod ignore;
pub mod scan;

pub use ignore::{Pattern, PatternMatcher, DEFAULT_PATTERNS};
pub use scan::{FsScanner, ScanOutcome, ScanRequest};
