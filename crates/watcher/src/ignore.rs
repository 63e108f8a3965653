//! Ignore pattern matching for tasklens
//!
//! Two sources of patterns, evaluated in order:
//! 1. Built-in defaults (VCS dirs, dependency and build output, caches,
//!    logs, lockfiles, source maps) - always active
//! 2. The project-local ignore file (`.tkignore` by default)
//!
//! User patterns are appended; they can never remove a default.
//!
//! Pattern shapes:
//! - `path/to/file`  exact match
//! - `dir/**`        everything below `dir/`
//! - `**/suffix`     any path ending in `suffix` (`**/*.log` ends in `.log`)
//! - anything else with `*`: `*` stays within one path segment, `**`
//!   crosses segments

use anyhow::Result;
use regex::Regex;
use std::path::Path;
use tk_core::DetectConfig;
use tracing::{debug, warn};

/// Patterns active in every project
pub const DEFAULT_PATTERNS: &[&str] = &[
    // Version control and our own data directory
    ".git/**",
    ".svn/**",
    ".hg/**",
    ".jj/**",
    ".tk/**",
    // Dependencies
    "node_modules/**",
    "**/node_modules/**",
    "bower_components/**",
    ".venv/**",
    "venv/**",
    // Build output
    "dist/**",
    "build/**",
    "out/**",
    "target/**",
    "coverage/**",
    ".next/**",
    ".nuxt/**",
    // Caches
    ".cache/**",
    ".parcel-cache/**",
    ".pytest_cache/**",
    "**/__pycache__/**",
    // Generated files
    "**/*.log",
    "**/*.map",
    "**/*.pyc",
    "**/package-lock.json",
    "**/yarn.lock",
    "**/pnpm-lock.yaml",
    "**/.DS_Store",
];

/// A single compiled ignore pattern
#[derive(Debug, Clone)]
pub enum Pattern {
    /// No wildcard: the path must equal the pattern
    Exact(String),
    /// `dir/**`: path starts with `prefix` (`dir/`)
    Subtree { raw: String, prefix: String },
    /// `**/tail`: path ends with `suffix`
    Suffix { raw: String, suffix: String },
    /// Any other wildcard pattern
    Wildcard { raw: String, regex: Regex },
}

impl Pattern {
    /// Compile one pattern line
    ///
    /// Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let mut raw = line.trim();
        if raw.is_empty() {
            return None;
        }

        // Anchors are implicit: every pattern is relative to the root
        while let Some(rest) = raw.strip_prefix("./") {
            raw = rest;
        }
        let raw = raw.trim_start_matches('/');
        if raw.is_empty() {
            return None;
        }

        // `dir/` is shorthand for `dir/**`
        let raw = if raw.ends_with('/') {
            format!("{}**", raw)
        } else {
            raw.to_string()
        };

        if !raw.contains('*') {
            return Some(Pattern::Exact(raw));
        }

        if let Some(dir) = raw.strip_suffix("**") {
            if dir.ends_with('/') && !dir.contains('*') {
                let prefix = dir.to_string();
                return Some(Pattern::Subtree { raw, prefix });
            }
        }

        if let Some(tail) = raw.strip_prefix("**/") {
            if !tail.contains('*') {
                let suffix = tail.to_string();
                return Some(Pattern::Suffix { raw, suffix });
            }
            if let Some(ext) = tail.strip_prefix('*') {
                if !ext.contains('*') && !ext.contains('/') {
                    let suffix = ext.to_string();
                    return Some(Pattern::Suffix { raw, suffix });
                }
            }
        }

        match Regex::new(&glob_to_regex(&raw)) {
            Ok(regex) => Some(Pattern::Wildcard { raw, regex }),
            Err(e) => {
                warn!("Skipping ignore pattern {:?}: {}", raw, e);
                None
            }
        }
    }

    /// Pattern text as written (after normalization)
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Exact(raw) => raw,
            Pattern::Subtree { raw, .. }
            | Pattern::Suffix { raw, .. }
            | Pattern::Wildcard { raw, .. } => raw,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        if path == self.as_str() {
            return true;
        }

        match self {
            Pattern::Exact(_) => false,
            Pattern::Subtree { prefix, .. } => path.starts_with(prefix.as_str()),
            Pattern::Suffix { suffix, .. } => path.ends_with(suffix.as_str()),
            Pattern::Wildcard { regex, .. } => regex.is_match(path),
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Translate a wildcard pattern into an anchored regex
///
/// `*` matches within one segment, `**` matches across segments, and a
/// leading or interior `**/` may match zero directories.
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut re = String::from("^");
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '*' {
            literal.push(chars[i]);
            i += 1;
            continue;
        }

        re.push_str(&regex::escape(&literal));
        literal.clear();

        let double = chars.get(i + 1) == Some(&'*');
        if !double {
            re.push_str("[^/]*");
            i += 1;
            continue;
        }

        let at_segment_start = i == 0 || chars[i - 1] == '/';
        if at_segment_start && chars.get(i + 2) == Some(&'/') {
            re.push_str("(?:.*/)?");
            i += 3;
        } else {
            re.push_str(".*");
            i += 2;
        }
    }

    re.push_str(&regex::escape(&literal));
    re.push('$');
    re
}

/// Evaluate `path` against `patterns` in order, stopping at the first hit
pub fn matches(path: &str, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|p| p.matches(path))
}

/// Ordered set of active ignore patterns
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
    builtin_count: usize,
}

impl PatternMatcher {
    /// Built-in defaults followed by `user` patterns
    pub fn new<I, S>(user: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns: Vec<Pattern> = DEFAULT_PATTERNS
            .iter()
            .filter_map(|p| Pattern::parse(p))
            .collect();
        let builtin_count = patterns.len();

        patterns.extend(user.into_iter().filter_map(|p| Pattern::parse(p.as_ref())));

        Self {
            patterns,
            builtin_count,
        }
    }

    /// Defaults only
    pub fn builtin() -> Self {
        Self::new(std::iter::empty::<&str>())
    }

    /// Load defaults plus the project's ignore file
    ///
    /// A missing ignore file is normal. An unreadable one is logged and
    /// the defaults still apply.
    pub fn load(config: &DetectConfig) -> Self {
        let path = config.ignore_path();
        let user = match Self::read_ignore_file(&path) {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!("Could not read {}: {}; using built-in patterns only", path.display(), e);
                Vec::new()
            }
        };

        debug!("Loaded {} user ignore patterns from {}", user.len(), path.display());
        Self::new(user)
    }

    /// Read pattern lines from an ignore file
    pub fn read_ignore_file(path: &Path) -> Result<Vec<String>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse_lines(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Split ignore-file text into patterns, dropping comments and blanks
    pub fn parse_lines(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }

    /// Check if a root-relative file path should be ignored
    pub fn is_ignored(&self, path: &str) -> bool {
        matches(path, &self.patterns)
    }

    /// Check a directory, so `dir/**` prunes `dir` itself
    pub fn is_ignored_dir(&self, path: &str) -> bool {
        if self.is_ignored(path) {
            return true;
        }
        let mut with_slash = String::with_capacity(path.len() + 1);
        with_slash.push_str(path);
        with_slash.push('/');
        self.is_ignored(&with_slash)
    }

    /// Check a path and every directory above it
    ///
    /// True when the path is ignored itself or lies inside a directory the
    /// walk prunes, so git output and stored keys agree with the scanner.
    pub fn is_ignored_path(&self, path: &str) -> bool {
        self.is_ignored(path)
            || path
                .match_indices('/')
                .any(|(i, _)| self.is_ignored_dir(&path[..i]))
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn builtin_patterns(&self) -> &[Pattern] {
        &self.patterns[..self.builtin_count]
    }

    pub fn user_patterns(&self) -> &[Pattern] {
        &self.patterns[self.builtin_count..]
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::builtin()
    }
}
