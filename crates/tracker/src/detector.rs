//! Change-detection orchestrator
//!
//! One call to `detect` is one invocation of the subsystem:
//!
//! 1. Load the fingerprint store (corrupt or missing = empty) and drop
//!    entries the ignore patterns exclude
//! 2. Ask git for the working-tree status when the root is a work tree;
//!    on any git failure fall back to the filesystem scanner
//! 3. Filter the resulting `ChangeSet` through the ignore patterns
//! 4. Record fingerprints for surviving new/modified paths, forget
//!    deleted ones, occasionally prune entries for vanished files
//! 5. Write the store back and report which strategy ran

use git::{CommandProbe, GitExtractor, GitProbe};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tk_core::store::normalize_path;
use tk_core::{
    ChangeSet, DetectConfig, DetectError, Fingerprint, FingerprintMap, FingerprintStore, Result,
    StrategyPreference,
};
use tracing::{debug, info, warn};
use watcher::{FsScanner, PatternMatcher, ScanRequest};

/// The strategy that actually produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Git,
    Filesystem,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Git => "git",
            Strategy::Filesystem => "filesystem",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-invocation options
#[derive(Debug, Clone, Default)]
pub struct DetectRequest {
    /// Restrict detection to this subtree (absolute, or relative to root)
    pub path_filter: Option<PathBuf>,

    /// Root-relative directories to scan first, usually from tasks
    pub priority_dirs: Vec<String>,

    /// Prune the store regardless of the configured probability
    pub force_prune: bool,
}

/// Outcome of one detection run
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub changes: ChangeSet,
    pub strategy: Strategy,

    /// The scanner hit its file ceiling; some files were not examined
    pub truncated: bool,

    pub files_inspected: usize,

    /// Paths the strategy reported that the ignore patterns removed
    pub filtered: usize,

    /// Store entries dropped because they are now ignored or malformed
    pub repaired: usize,

    /// Store entries dropped because their file no longer exists
    pub pruned: usize,
}

/// Result of an explicit store cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub repaired: usize,
    pub pruned: usize,
    pub remaining: usize,
}

/// Change-detection orchestrator
pub struct ChangeDetector<P: GitProbe = CommandProbe> {
    config: DetectConfig,
    matcher: PatternMatcher,
    git: GitExtractor<P>,
    store: FingerprintStore,
}

impl ChangeDetector<CommandProbe> {
    /// Detector using the `git` binary
    pub fn new(config: DetectConfig) -> Result<Self> {
        Self::with_probe(config, CommandProbe::new())
    }
}

impl<P: GitProbe> ChangeDetector<P> {
    pub fn with_probe(config: DetectConfig, probe: P) -> Result<Self> {
        config.validate()?;
        let matcher = PatternMatcher::load(&config);
        let store = FingerprintStore::new(config.store_path());

        Ok(Self {
            config,
            matcher,
            git: GitExtractor::with_probe(probe),
            store,
        })
    }

    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    pub fn matcher(&self) -> &PatternMatcher {
        &self.matcher
    }

    pub fn store(&self) -> &FingerprintStore {
        &self.store
    }

    pub fn git(&self) -> &GitExtractor<P> {
        &self.git
    }

    /// Run change detection once
    ///
    /// Only a missing root or path filter, or a failure to write the
    /// store, is returned as an error. Everything else degrades.
    pub fn detect(&self, request: &DetectRequest) -> Result<Detection> {
        let root = self.config.root.as_path();
        if !root.is_dir() {
            return Err(DetectError::InvalidTargetPath(root.to_path_buf()));
        }
        let filter = self.resolve_filter(request.path_filter.as_deref())?;

        let mut known = self.store.load_or_empty();
        let repaired = FingerprintStore::repair(&mut known, |p| self.matcher.is_ignored_path(p));

        let scan_request = ScanRequest {
            priority_dirs: self.priority_dirs(request, filter.as_deref()),
            path_filter: filter,
        };

        let (mut changes, mut observed, strategy, truncated, files_inspected) =
            match self.try_git(root) {
                Some(mut changes) => {
                    changes.retain(|p| scan_request.in_scope(p));
                    let inspected = changes.len();
                    (changes, FingerprintMap::new(), Strategy::Git, false, inspected)
                }
                None => {
                    let scanner = FsScanner::from_config(&self.config, &self.matcher);
                    let outcome = scanner.scan(&known, &scan_request)?;
                    (
                        outcome.changes,
                        outcome.observed,
                        Strategy::Filesystem,
                        outcome.truncated,
                        outcome.files_inspected,
                    )
                }
            };

        let filtered = changes.retain(|p| !self.matcher.is_ignored_path(p));
        if filtered > 0 {
            debug!("Ignore patterns removed {} reported paths", filtered);
        }

        self.apply(&mut known, &changes, &mut observed);

        let pruned = if request.force_prune || self.roll_prune() {
            FingerprintStore::prune(&mut known, root)
        } else {
            0
        };

        self.store.save(&known)?;

        info!(
            "{} detection: {} new, {} modified, {} deleted",
            strategy,
            changes.new.len(),
            changes.modified.len(),
            changes.deleted.len()
        );

        Ok(Detection {
            changes,
            strategy,
            truncated,
            files_inspected,
            filtered,
            repaired,
            pruned,
        })
    }

    /// Repair and prune the store unconditionally
    pub fn prune_store(&self) -> Result<PruneReport> {
        let root = self.config.root.as_path();
        if !root.is_dir() {
            return Err(DetectError::InvalidTargetPath(root.to_path_buf()));
        }

        let mut known = self.store.load_or_empty();
        let repaired = FingerprintStore::repair(&mut known, |p| self.matcher.is_ignored_path(p));
        let pruned = FingerprintStore::prune(&mut known, root);
        self.store.save(&known)?;

        Ok(PruneReport {
            repaired,
            pruned,
            remaining: known.len(),
        })
    }

    /// Git changes, or `None` when the filesystem scanner should run
    fn try_git(&self, root: &Path) -> Option<ChangeSet> {
        let preference = self.config.scan.strategy;
        if preference == StrategyPreference::Fs {
            return None;
        }

        if !self.git.is_repository(root) {
            if preference == StrategyPreference::Git {
                warn!("{} is not a git work tree; using filesystem scan", root.display());
            } else {
                debug!("No git work tree at {}; using filesystem scan", root.display());
            }
            return None;
        }

        match self.git.extract(root) {
            Ok(changes) => Some(changes),
            Err(e) => {
                warn!("{}; falling back to filesystem scan", e);
                None
            }
        }
    }

    /// Normalize the caller's path filter to a root-relative string
    fn resolve_filter(&self, filter: Option<&Path>) -> Result<Option<String>> {
        let Some(filter) = filter else {
            return Ok(None);
        };
        let root = self.config.root.as_path();

        let relative = if filter.is_absolute() {
            filter
                .strip_prefix(root)
                .map_err(|_| DetectError::InvalidTargetPath(filter.to_path_buf()))?
        } else {
            filter
        };

        if relative.as_os_str().is_empty() {
            return Ok(None);
        }

        let Some(rel) = normalize_path(relative) else {
            // "." and friends mean the whole root; ".." escapes it
            if relative.components().all(|c| c == std::path::Component::CurDir) {
                return Ok(None);
            }
            return Err(DetectError::InvalidTargetPath(filter.to_path_buf()));
        };

        if !root.join(&rel).exists() {
            return Err(DetectError::InvalidTargetPath(root.join(&rel)));
        }
        Ok(Some(rel))
    }

    /// Task directories first, then conventional source directories
    fn priority_dirs(&self, request: &DetectRequest, filter: Option<&str>) -> Vec<String> {
        let mut dirs = request.priority_dirs.clone();
        for dir in &self.config.scan.source_dirs {
            if let Some(filter) = filter {
                dirs.push(format!("{}/{}", filter, dir));
            }
            dirs.push(dir.clone());
        }
        dirs
    }

    /// Bring the store in line with `changes`
    fn apply(
        &self,
        known: &mut FingerprintMap,
        changes: &ChangeSet,
        observed: &mut FingerprintMap,
    ) {
        for rel in &changes.deleted {
            known.remove(rel);
        }

        for rel in changes.new.iter().chain(changes.modified.iter()) {
            let fingerprint = match observed.remove(rel) {
                Some(fp) => Ok(fp),
                None => {
                    let mode = known
                        .get(rel)
                        .map(Fingerprint::mode)
                        .unwrap_or(self.config.scan.fingerprint);
                    Fingerprint::compute(&self.config.root.join(rel), mode)
                }
            };

            match fingerprint {
                Ok(fp) => {
                    known.insert(rel.clone(), fp);
                }
                Err(source) => {
                    let e = DetectError::PathUnreadable {
                        path: PathBuf::from(rel),
                        source,
                    };
                    warn!("{}; not recording a fingerprint", e);
                    known.remove(rel);
                }
            }
        }
    }

    fn roll_prune(&self) -> bool {
        let p = self.config.store.prune_probability;
        p > 0.0 && rand::thread_rng().gen_bool(p)
    }
}
