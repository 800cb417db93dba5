//! nginx-allowlist - Allow-list generator for nginx
//!
//! Fetches published IP range lists and writes an allow/deny snippet.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use nginx_allowlist::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            dry_run,
            output_dir,
        } => nginx_allowlist::commands::generate::run(dry_run, output_dir, &cli.config).await,
        Commands::Sources => nginx_allowlist::commands::sources::run(&cli.config),
        Commands::Init { force } => nginx_allowlist::commands::init::run(force, &cli.config),
        Commands::Version => {
            println!("nginx-allowlist {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
