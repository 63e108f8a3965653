//! Persisted fingerprint store
//!
//! One JSON object per project, mapping a root-relative path to the
//! fingerprint last observed for it:
//! ```text
//! {
//!   "src/main.rs": { "size": 812, "mtime_ms": 1718000000000 },
//!   "README.md":   { "hash": "9f86d0..." }
//! }
//! ```
//! The whole map is read, mutated in memory, and written back atomically.

use crate::error::{DetectError, Result};
use crate::fingerprint::Fingerprint;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Relative path -> fingerprint, sorted so the file diffs cleanly
pub type FingerprintMap = BTreeMap<String, Fingerprint>;

/// Handle on the fingerprint file
#[derive(Debug, Clone)]
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store
    ///
    /// A missing file is an empty map. Unparseable content is
    /// `StoreCorrupt`.
    pub fn load(&self) -> Result<FingerprintMap> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FingerprintMap::new())
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(FingerprintMap::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| DetectError::StoreCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the store, treating any failure as a first run
    pub fn load_or_empty(&self) -> FingerprintMap {
        match self.load() {
            Ok(map) => map,
            Err(e) => {
                warn!("{}; starting from an empty fingerprint store", e);
                FingerprintMap::new()
            }
        }
    }

    /// Write the whole map atomically
    pub fn save(&self, map: &FingerprintMap) -> Result<()> {
        let data = serde_json::to_vec_pretty(map).map_err(std::io::Error::from)?;
        atomic_write(&self.path, &data)?;
        debug!("Saved {} fingerprints to {}", map.len(), self.path.display());
        Ok(())
    }

    /// Remove entries whose file is gone from `root`
    ///
    /// Only a confirmed `NotFound` removes an entry. A path that cannot be
    /// checked keeps its fingerprint.
    pub fn prune(map: &mut FingerprintMap, root: &Path) -> usize {
        let before = map.len();
        map.retain(|rel, _| match root.join(rel).symlink_metadata() {
            Ok(_) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warn!("Cannot check {}: {}; keeping its fingerprint", rel, e);
                true
            }
        });
        let removed = before - map.len();
        if removed > 0 {
            debug!("Pruned {} stale fingerprints", removed);
        }
        removed
    }

    /// Remove entries that must not be tracked
    ///
    /// Drops keys that are not normalized relative paths and keys the
    /// active ignore patterns exclude.
    pub fn repair(map: &mut FingerprintMap, is_ignored: impl Fn(&str) -> bool) -> usize {
        let before = map.len();
        map.retain(|rel, _| is_normalized(rel) && !is_ignored(rel));
        let removed = before - map.len();
        if removed > 0 {
            debug!("Repaired fingerprint store: dropped {} entries", removed);
        }
        removed
    }
}

/// Atomic write helper
///
/// Writes to a temporary file next to the target, fsyncs it, then
/// renames it over the target.
pub fn atomic_write(target: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Normalize a path for storage
///
/// - Produces a relative path with `/` separators
/// - Rejects `..` and absolute paths
/// - Removes `./` components
pub fn normalize_path(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// True if `rel` is already in the form `normalize_path` produces
pub fn is_normalized(rel: &str) -> bool {
    !rel.is_empty()
        && !rel.contains('\\')
        && rel
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}
