//! Generate command implementation.
//!
//! Order matters here: the output location is resolved and prepared
//! before any network I/O, so a misconfigured host fails immediately.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::coordinator::{Coordinator, SourceOutcome};
use crate::fetcher::Fetcher;
use crate::fs_abstraction::{real_fs, FileSystem};
use crate::lock::LockGuard;
use crate::platform::{prepare_output_dir, FixedLocator, OutputLocator, PlatformLocator};
use crate::utils::format_count;
use crate::writer::{write_config, GeneratedConfig};

/// Summary of one generation run
#[derive(Debug)]
pub struct GenerateReport {
    pub path: PathBuf,
    pub generated: GeneratedConfig,
    pub outcomes: Vec<SourceOutcome>,
    /// False for dry runs
    pub written: bool,
}

impl GenerateReport {
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Run the full pipeline with injected collaborators.
///
/// Fetch failures are tolerated. Only output location and write
/// problems return an error.
pub async fn execute(
    config: &Config,
    locator: &dyn OutputLocator,
    fs: &dyn FileSystem,
    fetcher: Fetcher,
    dry_run: bool,
) -> Result<GenerateReport> {
    let dir = locator
        .output_dir()
        .context("Failed to resolve output directory")?;
    let path = dir.join(&config.output_file);

    let _lock = if dry_run {
        None
    } else {
        prepare_output_dir(fs, &dir)?;
        Some(LockGuard::acquire(&path)?)
    };

    info!("Fetching {} sources...", config.sources.len());
    let coordinator = Coordinator::new(config.sources.clone(), fetcher);
    let collection = coordinator.collect().await;

    let generated = GeneratedConfig::new(config, collection.buckets);

    if !dry_run {
        write_config(fs, &path, &generated)?;
    }

    Ok(GenerateReport {
        path,
        generated,
        outcomes: collection.outcomes,
        written: !dry_run,
    })
}

/// Run the generate command
pub async fn run(dry_run: bool, output_dir: Option<PathBuf>, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(real_fs(), config_path)?;

    let locator: Box<dyn OutputLocator> = match output_dir.or_else(|| config.output_dir.clone()) {
        Some(dir) => Box::new(FixedLocator(dir)),
        None => Box::new(PlatformLocator::current()),
    };

    let fetcher = Fetcher::http(
        Duration::from_secs(config.fetch_timeout_secs),
        config.max_response_bytes,
    )?;

    let report = execute(&config, locator.as_ref(), real_fs(), fetcher, dry_run).await?;

    if !report.written {
        println!("{}", report.generated.render());
        return Ok(());
    }

    let failed = report.failed_sources().count();
    println!();
    if failed > 0 {
        println!("[WARN] {} of {} sources failed:", failed, report.outcomes.len());
        for outcome in report.failed_sources() {
            println!("  {}", outcome);
        }
    }
    println!(
        "[OK] {} allow rules written to {}",
        format_count(report.generated.allow_count()),
        report.path.display()
    );

    Ok(())
}
