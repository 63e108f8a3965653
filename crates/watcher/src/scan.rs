//! Bounded filesystem scanner
//!
//! Walks the project, pruning ignored directories before descending, and
//! classifies every eligible file against the stored fingerprints. The walk
//! stops at a hard file-count ceiling and flags the result as partial.

use crate::ignore::PatternMatcher;
use ahash::AHashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tk_core::store::normalize_path;
use tk_core::{
    ChangeKind, ChangeSet, DetectConfig, DetectError, Fingerprint, FingerprintMap, FingerprintMode,
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What part of the tree to scan, and what to look at first
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Root-relative subtree to restrict the scan to
    pub path_filter: Option<String>,

    /// Root-relative directories walked before the rest of the subtree
    pub priority_dirs: Vec<String>,
}

impl ScanRequest {
    pub fn full() -> Self {
        Self::default()
    }

    /// True if `rel` lies inside the path filter (or there is none)
    pub fn in_scope(&self, rel: &str) -> bool {
        match &self.path_filter {
            None => true,
            Some(filter) => within(rel, filter),
        }
    }
}

/// Result of one scan
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub changes: ChangeSet,

    /// Fresh fingerprints for every new or modified file
    pub observed: FingerprintMap,

    pub files_inspected: usize,

    /// The file ceiling was hit; unvisited files were not classified
    pub truncated: bool,

    /// Entries skipped because they could not be read
    pub unreadable: usize,
}

/// Filesystem change scanner
pub struct FsScanner<'a> {
    root: PathBuf,
    matcher: &'a PatternMatcher,
    max_files: usize,
    mode: FingerprintMode,
}

impl<'a> FsScanner<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        matcher: &'a PatternMatcher,
        max_files: usize,
        mode: FingerprintMode,
    ) -> Self {
        Self {
            root: root.into(),
            matcher,
            max_files,
            mode,
        }
    }

    pub fn from_config(config: &DetectConfig, matcher: &'a PatternMatcher) -> Self {
        Self::new(
            config.root.clone(),
            matcher,
            config.scan.max_files,
            config.scan.fingerprint,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compare the tree against `known` and classify every difference
    pub fn scan(
        &self,
        known: &FingerprintMap,
        request: &ScanRequest,
    ) -> Result<ScanOutcome, DetectError> {
        if !self.root.is_dir() {
            return Err(DetectError::InvalidTargetPath(self.root.clone()));
        }
        if let Some(filter) = &request.path_filter {
            let target = self.root.join(filter);
            if !target.exists() {
                return Err(DetectError::InvalidTargetPath(target));
            }
        }

        let mut outcome = ScanOutcome::default();
        let mut visited = AHashSet::new();

        for start in self.walk_order(request) {
            if outcome.truncated {
                break;
            }
            self.walk(&start, known, &mut visited, &mut outcome);
        }

        for rel in known.keys() {
            if visited.contains(rel.as_str())
                || !request.in_scope(rel)
                || self.matcher.is_ignored_path(rel)
            {
                continue;
            }
            match self.root.join(rel).symlink_metadata() {
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("deleted: {}", rel);
                    outcome.changes.record(ChangeKind::Deleted, rel.clone());
                }
                Err(e) => {
                    warn!("Cannot check {}: {}; keeping its fingerprint", rel, e);
                    outcome.unreadable += 1;
                }
            }
        }

        info!(
            "Scanned {} files: {} new, {} modified, {} deleted{}",
            outcome.files_inspected,
            outcome.changes.new.len(),
            outcome.changes.modified.len(),
            outcome.changes.deleted.len(),
            if outcome.truncated { " (partial)" } else { "" }
        );

        Ok(outcome)
    }

    /// Walk starting points, root-relative ("" is the project root)
    fn walk_order(&self, request: &ScanRequest) -> Vec<String> {
        let filter = request.path_filter.clone().unwrap_or_default();
        if !filter.is_empty() && self.is_pruned_dir(&filter) {
            debug!("{} is ignored; nothing to walk", filter);
            return Vec::new();
        }

        let mut order: Vec<String> = Vec::new();
        for dir in &request.priority_dirs {
            let Some(dir) = normalize_path(Path::new(dir)) else {
                continue;
            };
            if !within(&dir, &filter) || order.contains(&dir) {
                continue;
            }
            if self.is_pruned_dir(&dir) || !self.root.join(&dir).is_dir() {
                continue;
            }
            order.push(dir);
        }
        order.push(filter);
        order
    }

    /// A directory the full walk would never enter
    fn is_pruned_dir(&self, rel: &str) -> bool {
        self.matcher.is_ignored_dir(rel) || self.matcher.is_ignored_path(rel)
    }

    fn walk(
        &self,
        start: &str,
        known: &FingerprintMap,
        visited: &mut AHashSet<String>,
        outcome: &mut ScanOutcome,
    ) {
        let start_path = if start.is_empty() {
            self.root.clone()
        } else {
            self.root.join(start)
        };

        let root = &self.root;
        let matcher = self.matcher;
        let walker = WalkDir::new(&start_path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let Some(rel) = relative(root, entry.path()) else {
                    // The project root itself
                    return true;
                };
                if entry.file_type().is_dir() {
                    !matcher.is_ignored_dir(&rel)
                } else {
                    !matcher.is_ignored(&rel)
                }
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| start_path.clone());
                    warn!("Skipping unreadable path {}: {}", path.display(), e);
                    outcome.unreadable += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(rel) = relative(root, entry.path()) else {
                continue;
            };
            if visited.contains(&rel) {
                continue;
            }

            if outcome.files_inspected >= self.max_files {
                warn!(
                    "File limit of {} reached; change detection results are partial",
                    self.max_files
                );
                outcome.truncated = true;
                return;
            }
            outcome.files_inspected += 1;
            visited.insert(rel.clone());

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Skipping unreadable file {}: {}", rel, e);
                    outcome.unreadable += 1;
                    continue;
                }
            };

            // Compare in the stored entry's mode so a mode switch does not
            // flag every file as modified
            let (mode, previous) = match known.get(&rel) {
                Some(fp) => (fp.mode(), Some(fp)),
                None => (self.mode, None),
            };

            let current = match Fingerprint::compute_with_metadata(entry.path(), &metadata, mode) {
                Ok(fp) => fp,
                Err(e) => {
                    warn!("Skipping unreadable file {}: {}", rel, e);
                    outcome.unreadable += 1;
                    continue;
                }
            };

            match previous {
                None => {
                    debug!("new: {}", rel);
                    outcome.changes.record(ChangeKind::New, rel.clone());
                    outcome.observed.insert(rel, current);
                }
                Some(old) if *old != current => {
                    debug!("modified: {}", rel);
                    outcome.changes.record(ChangeKind::Modified, rel.clone());
                    outcome.observed.insert(rel, current);
                }
                Some(_) => {}
            }
        }
    }
}

/// Root-relative normalized form of `path`, `None` for the root itself
fn relative(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    normalize_path(rel)
}

fn within(rel: &str, dir: &str) -> bool {
    dir.is_empty()
        || rel == dir
        || (rel.len() > dir.len() && rel.starts_with(dir) && rel.as_bytes()[dir.len()] == b'/')
}
