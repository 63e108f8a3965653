//! File fingerprints used to decide whether a file changed

use crate::config::FingerprintMode;
use crate::hash::{hash_file_auto, Blake3Hash};
use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Observed state of a file
///
/// `Content` survives mtime-only touches. `Stat` costs one `stat` call and
/// is what the scanner uses by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fingerprint {
    Content { hash: Blake3Hash },
    Stat { size: u64, mtime_ms: u64 },
}

impl Fingerprint {
    pub fn mode(&self) -> FingerprintMode {
        match self {
            Fingerprint::Content { .. } => FingerprintMode::Content,
            Fingerprint::Stat { .. } => FingerprintMode::Stat,
        }
    }

    /// Build a stat fingerprint from already-fetched metadata
    pub fn from_metadata(metadata: &Metadata) -> std::io::Result<Self> {
        let mtime_ms = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Ok(Fingerprint::Stat {
            size: metadata.len(),
            mtime_ms,
        })
    }

    /// Compute a fingerprint of `path` in the requested mode
    pub fn compute(path: &Path, mode: FingerprintMode) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Self::compute_with_metadata(path, &metadata, mode)
    }

    pub fn compute_with_metadata(
        path: &Path,
        metadata: &Metadata,
        mode: FingerprintMode,
    ) -> std::io::Result<Self> {
        match mode {
            FingerprintMode::Stat => Self::from_metadata(metadata),
            FingerprintMode::Content => {
                let hash = hash_file_auto(path, metadata.len())?;
                Ok(Fingerprint::Content { hash })
            }
        }
    }
}
