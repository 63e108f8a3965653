//! Detection configuration
//!
//! Loaded once by the caller from `.tk/config.toml` and handed to the
//! detector. Nothing below this layer reads the environment or the
//! current directory.

use crate::error::{DetectError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-local data directory
pub const DATA_DIR_NAME: &str = ".tk";

/// Name of the config file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Which change-detection strategy to try first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyPreference {
    /// Git when the root is inside a work tree, filesystem otherwise
    #[default]
    Auto,
    /// Git, still degrading to the filesystem scanner on failure
    Git,
    /// Never probe git
    #[serde(alias = "filesystem")]
    Fs,
}

/// How the scanner fingerprints new files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintMode {
    /// Size + modification time
    #[default]
    Stat,
    /// BLAKE3 of the file content
    Content,
}

/// How task-declared paths are correlated with changed paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// Equal, or either string ends with the other
    #[default]
    Suffix,
    /// Like `Suffix`, but the shorter path must start at a `/` boundary
    Segment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Hard ceiling on files inspected per invocation
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    #[serde(default)]
    pub strategy: StrategyPreference,

    #[serde(default)]
    pub fingerprint: FingerprintMode,

    /// Conventional source directories walked before the rest of the tree
    #[serde(default = "default_source_dirs")]
    pub source_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            strategy: StrategyPreference::default(),
            fingerprint: FingerprintMode::default(),
            source_dirs: default_source_dirs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Fingerprint file name inside the data directory
    #[serde(default = "default_store_file")]
    pub file: String,

    /// Chance per invocation of pruning entries for vanished files
    #[serde(default = "default_prune_probability")]
    pub prune_probability: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file: default_store_file(),
            prune_probability: default_prune_probability(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoreConfig {
    /// User pattern file, relative to the project root
    #[serde(default = "default_ignore_file")]
    pub file: String,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            file: default_ignore_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Task file name inside the data directory
    #[serde(default = "default_task_file")]
    pub file: String,

    #[serde(default)]
    pub match_policy: MatchPolicy,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            file: default_task_file(),
            match_policy: MatchPolicy::default(),
        }
    }
}

/// Everything the detector needs for one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectConfig {
    /// Project root; every reported path is relative to it
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,

    #[serde(default)]
    pub tasks: TaskConfig,
}

impl DetectConfig {
    /// Defaults for a project rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scan: ScanConfig::default(),
            store: StoreConfig::default(),
            ignore: IgnoreConfig::default(),
            tasks: TaskConfig::default(),
        }
    }

    /// Load `<root>/.tk/config.toml`, falling back to defaults when absent
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path_for(root);
        if !path.exists() {
            return Ok(Self::new(root));
        }

        let text = std::fs::read_to_string(&path)?;
        let mut config: DetectConfig = toml::from_str(&text)
            .map_err(|e| DetectError::Config(format!("{}: {}", path.display(), e)))?;
        config.root = root.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.max_files == 0 {
            return Err(DetectError::Config("scan.max_files must be at least 1".into()));
        }

        let p = self.store.prune_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(DetectError::Config(format!(
                "store.prune_probability must be between 0 and 1, got {}",
                p
            )));
        }

        for (key, name) in [
            ("store.file", &self.store.file),
            ("ignore.file", &self.ignore.file),
            ("tasks.file", &self.tasks.file),
        ] {
            validate_file_name(key, name)?;
        }

        Ok(())
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn config_path_for(root: &Path) -> PathBuf {
        root.join(DATA_DIR_NAME).join(CONFIG_FILE_NAME)
    }

    pub fn config_path(&self) -> PathBuf {
        Self::config_path_for(&self.root)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR_NAME)
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join(&self.store.file)
    }

    pub fn task_path(&self) -> PathBuf {
        self.data_dir().join(&self.tasks.file)
    }

    pub fn ignore_path(&self) -> PathBuf {
        self.root.join(&self.ignore.file)
    }
}

fn validate_file_name(key: &str, name: &str) -> Result<()> {
    let path = Path::new(name);
    let traverses = path
        .components()
        .any(|c| !matches!(c, std::path::Component::Normal(_)));

    if name.trim().is_empty() || traverses {
        return Err(DetectError::Config(format!(
            "{} must be a plain relative file name, got {:?}",
            key, name
        )));
    }
    Ok(())
}

fn default_max_files() -> usize {
    10_000
}

fn default_source_dirs() -> Vec<String> {
    ["src", "lib", "app", "tests", "test"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_store_file() -> String {
    "fingerprints.json".to_string()
}

fn default_prune_probability() -> f64 {
    0.1
}

fn default_ignore_file() -> String {
    ".tkignore".to_string()
}

fn default_task_file() -> String {
    "tasks.json".to_string()
}
