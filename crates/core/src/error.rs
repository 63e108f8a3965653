//! Error taxonomy for change detection
//!
//! Most of these are recovered inside the detector and only logged.
//! `InvalidTargetPath`, `Config` and `Io` are the ones callers see.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectError>;

#[derive(Error, Debug)]
pub enum DetectError {
    /// A detection strategy could not run (git missing, git failed)
    #[error("Strategy unavailable: {0}")]
    StrategyUnavailable(String),

    /// A single path could not be read during a scan
    #[error("Path unreadable: {path}: {source}")]
    PathUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fingerprint store holds data that does not parse
    #[error("Fingerprint store corrupt at {path}: {source}")]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The caller asked to scan a path that does not exist
    #[error("Target path does not exist: {0}")]
    InvalidTargetPath(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DetectError {
    /// True for conditions that end the invocation
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DetectError::InvalidTargetPath(_) | DetectError::Config(_) | DetectError::Io(_)
        )
    }
}
