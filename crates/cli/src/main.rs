//! Tasklens CLI - tk command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod util;

use cmd::DetectArgs;

/// Tasklens - which tasks do my working-tree changes touch?
#[derive(Parser)]
#[command(name = "tk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root (default: nearest ancestor with .tk/, else the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .tk/ with a default config, an empty task list and a .tkignore template
    Init,
    /// Show files that are new, modified or deleted since the last check
    Changes(DetectArgs),
    /// Show tasks whose related files changed
    Affected(DetectArgs),
    /// Drop fingerprints for files that no longer exist or are now ignored
    Prune,
    /// List active ignore patterns
    Ignore,
    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init => cmd::init::run(&util::init_root(cli.root)?),
        Commands::Changes(args) => cmd::changes::run(&util::project_root(cli.root)?, &args),
        Commands::Affected(args) => cmd::affected::run(&util::project_root(cli.root)?, &args),
        Commands::Prune => cmd::prune::run(&util::project_root(cli.root)?),
        Commands::Ignore => cmd::ignore::run(&util::project_root(cli.root)?),
        Commands::Config => cmd::config::run(&util::project_root(cli.root)?),
    }
}

/// Logs go to stderr so stdout stays clean for `--json`
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
