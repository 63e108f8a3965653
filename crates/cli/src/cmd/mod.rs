//! CLI command implementations

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tk_core::StrategyPreference;

pub mod affected;
pub mod changes;
pub mod config;
pub mod ignore;
pub mod init;
pub mod prune;

/// Flags shared by `changes` and `affected`
#[derive(Args, Debug, Clone, Default)]
pub struct DetectArgs {
    /// Only look below this path (relative to the current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Override the configured detection strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Override the file-count ceiling for the filesystem scan
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Drop fingerprints of vanished files on this run
    #[arg(long)]
    pub prune: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// git when available, filesystem scan otherwise
    Auto,
    /// Prefer git, still falling back to the scanner
    Git,
    /// Always scan the filesystem
    Fs,
}

impl From<StrategyArg> for StrategyPreference {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Auto => StrategyPreference::Auto,
            StrategyArg::Git => StrategyPreference::Git,
            StrategyArg::Fs => StrategyPreference::Fs,
        }
    }
}
