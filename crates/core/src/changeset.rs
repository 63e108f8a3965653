//! Three-way classification of changed paths

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of change observed for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    New,
    Modified,
    Deleted,
}

/// Paths that changed since the last check, relative to the scan root
///
/// A path is in at most one of the three sets. Recording a path under a
/// new kind moves it out of the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub new: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ChangeKind, path: impl Into<String>) {
        let path = path.into();
        self.new.remove(&path);
        self.modified.remove(&path);
        self.deleted.remove(&path);

        match kind {
            ChangeKind::New => self.new.insert(path),
            ChangeKind::Modified => self.modified.insert(path),
            ChangeKind::Deleted => self.deleted.insert(path),
        };
    }

    pub fn kind_of(&self, path: &str) -> Option<ChangeKind> {
        if self.new.contains(path) {
            Some(ChangeKind::New)
        } else if self.modified.contains(path) {
            Some(ChangeKind::Modified)
        } else if self.deleted.contains(path) {
            Some(ChangeKind::Deleted)
        } else {
            None
        }
    }

    /// Keep only the paths for which `keep` returns true
    ///
    /// Returns the number of paths removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.len();
        self.new.retain(|p| keep(p));
        self.modified.retain(|p| keep(p));
        self.deleted.retain(|p| keep(p));
        before - self.len()
    }

    /// Iterate all paths with their kind (new, then modified, then deleted)
    pub fn iter(&self) -> impl Iterator<Item = (ChangeKind, &str)> {
        self.new
            .iter()
            .map(|p| (ChangeKind::New, p.as_str()))
            .chain(self.modified.iter().map(|p| (ChangeKind::Modified, p.as_str())))
            .chain(self.deleted.iter().map(|p| (ChangeKind::Deleted, p.as_str())))
    }

    /// Every changed path regardless of kind
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.new.len() + self.modified.len() + self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
