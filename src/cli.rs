//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/nginx-allowlist/config.yaml";

#[derive(Parser, Debug)]
#[command(name = "nginx-allowlist")]
#[command(author, version, about = "Generate an nginx allow-list from remote IP range lists")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (built-in sources are used if it does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Fetch all sources and regenerate the allow-list file
    Generate {
        /// Print the generated file to stdout instead of writing it
        #[arg(long)]
        dry_run: bool,

        /// Output directory (overrides config and platform default)
        #[arg(long, short)]
        output_dir: Option<PathBuf>,
    },

    /// List configured sources
    Sources,

    /// Write a default configuration file to the config path
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}
