//! Git working-tree status extraction
//!
//! Parses `git status --porcelain` (v1) lines:
//! ```text
//! XY path
//! XY old -> new
//! ```
//! The first non-space of `X`/`Y` decides the kind. Paths come back
//! relative to the scan root. Ignore patterns are NOT applied here; the
//! detector filters both strategies in one place.

use crate::probe::{CommandProbe, GitProbe};
use std::path::Path;
use tk_core::{ChangeKind, ChangeSet, DetectError};
use tracing::{debug, info};

/// One parsed status line, path relative to the repository top level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub kind: ChangeKind,
    pub path: String,
}

/// Git change extractor
pub struct GitExtractor<P: GitProbe = CommandProbe> {
    probe: P,
}

impl GitExtractor<CommandProbe> {
    pub fn new() -> Self {
        Self::with_probe(CommandProbe::new())
    }
}

impl Default for GitExtractor<CommandProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: GitProbe> GitExtractor<P> {
    pub fn with_probe(probe: P) -> Self {
        Self { probe }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Cheap check; probe failures read as `false`
    pub fn is_repository(&self, root: &Path) -> bool {
        self.probe.is_work_tree(root)
    }

    /// Classify the working-tree status below `root`
    pub fn extract(&self, root: &Path) -> Result<ChangeSet, DetectError> {
        let prefix = self
            .probe
            .show_prefix(root)
            .map_err(|e| DetectError::StrategyUnavailable(format!("{:#}", e)))?;
        let status = self
            .probe
            .status_porcelain(root)
            .map_err(|e| DetectError::StrategyUnavailable(format!("{:#}", e)))?;

        let mut changes = ChangeSet::new();
        for entry in parse_porcelain(&status) {
            let Some(rel) = entry.path.strip_prefix(prefix.as_str()) else {
                debug!("Outside scan root, skipping: {}", entry.path);
                continue;
            };
            let rel = rel.trim_end_matches('/');
            if rel.is_empty() {
                continue;
            }
            changes.record(entry.kind, rel);
        }

        info!(
            "git status: {} new, {} modified, {} deleted",
            changes.new.len(),
            changes.modified.len(),
            changes.deleted.len()
        );
        Ok(changes)
    }
}

/// Parse porcelain v1 output into entries, in output order
pub fn parse_porcelain(output: &str) -> Vec<StatusEntry> {
    let mut entries = Vec::new();

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.len() < 4 || !line.is_char_boundary(3) {
            continue;
        }

        let bytes = line.as_bytes();
        let code = if bytes[0] != b' ' { bytes[0] } else { bytes[1] };
        let rest = &line[3..];

        match code {
            b'!' | b' ' => continue,
            b'R' | b'C' => {
                if let Some((old, new)) = rest.split_once(" -> ") {
                    if code == b'R' {
                        entries.push(StatusEntry {
                            kind: ChangeKind::Deleted,
                            path: unquote(old),
                        });
                    }
                    entries.push(StatusEntry {
                        kind: ChangeKind::New,
                        path: unquote(new),
                    });
                } else {
                    entries.push(StatusEntry {
                        kind: ChangeKind::Modified,
                        path: unquote(rest),
                    });
                }
            }
            b'A' | b'?' => entries.push(StatusEntry {
                kind: ChangeKind::New,
                path: unquote(rest),
            }),
            b'D' => entries.push(StatusEntry {
                kind: ChangeKind::Deleted,
                path: unquote(rest),
            }),
            _ => entries.push(StatusEntry {
                kind: ChangeKind::Modified,
                path: unquote(rest),
            }),
        }
    }

    entries
}

/// Undo git's C-style quoting of unusual path names
fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut out: Vec<u8> = Vec::with_capacity(inner.len());
    let bytes = inner.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 >= bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let next = bytes[i + 1];
        match next {
            b'0'..=b'7' => {
                let digits = bytes[i + 1..]
                    .iter()
                    .take(3)
                    .take_while(|b| (b'0'..=b'7').contains(*b))
                    .count();
                let value = bytes[i + 1..i + 1 + digits]
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                out.push(value as u8);
                i += 1 + digits;
            }
            _ => {
                out.push(match next {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b'f' => 0x0c,
                    b'v' => 0x0b,
                    other => other,
                });
                i += 2;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
