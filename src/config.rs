//! Configuration management for nginx-allowlist.
//!
//! The configuration is an immutable value built once at startup and passed
//! down to the pipeline. When no config file exists the built-in defaults
//! are used, which mirror the lists the tool has always shipped with.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::AllowlistError;
use crate::fs_abstraction::FileSystem;

/// Default output file name inside the nginx configuration directory
pub const DEFAULT_OUTPUT_FILE: &str = "allow-cloudflare-only.conf";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Maximum size per list (10 MB)
/// The published provider lists are a few KB, so this is generous
const DEFAULT_MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

/// Address family of a source and of the bucket its lines land in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Ipv4 => f.write_str("IPv4"),
            Family::Ipv6 => f.write_str("IPv6"),
        }
    }
}

/// A remote plain-text list of IP ranges.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub url: String,
    pub family: Family,
}

impl Source {
    pub fn new(url: impl Into<String>, family: Family) -> Self {
        Self {
            url: url.into(),
            family,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Remote lists to fetch
    pub sources: Vec<Source>,

    /// Operator-supplied ranges, emitted before the fetched ones
    pub allowlist: Vec<String>,

    /// File name of the generated configuration
    pub output_file: String,

    /// Output directory (platform default when unset)
    pub output_dir: Option<PathBuf>,

    /// Upper bound on a single fetch, in seconds
    pub fetch_timeout_secs: u64,

    /// Upper bound on a single response body, in bytes
    pub max_response_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            allowlist: default_allowlist(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            output_dir: None,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to the built-in lists when the
    /// file does not exist. A file that exists but is invalid is an error.
    pub fn load_or_default(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if fs.exists(path) {
            debug!("Loading config from {:?}", path);
            Self::load(fs, path)
        } else {
            info!("No config file at {:?}, using built-in sources", path);
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        for source in &self.sources {
            validate_source_url(&source.url)?;
        }

        if self.output_file.is_empty() {
            return Err(AllowlistError::Config("output_file cannot be empty".to_string()).into());
        }

        // Must be a bare file name: the directory comes from output_dir or the platform
        if Path::new(&self.output_file).file_name() != Some(OsStr::new(&self.output_file)) {
            return Err(AllowlistError::Config(format!(
                "output_file must be a file name, not a path: {}",
                self.output_file
            ))
            .into());
        }

        if self.fetch_timeout_secs == 0 {
            return Err(
                AllowlistError::Config("fetch_timeout_secs must be greater than 0".to_string())
                    .into(),
            );
        }

        if self.max_response_bytes == 0 {
            return Err(
                AllowlistError::Config("max_response_bytes must be greater than 0".to_string())
                    .into(),
            );
        }

        Ok(())
    }

    /// Source URLs in configured order
    pub fn source_urls(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.url.clone()).collect()
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// Only http(s) URLs can be fetched
fn validate_source_url(url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| AllowlistError::Config(format!("Invalid source URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AllowlistError::Config(format!(
            "Source URL must use http or https (got '{}'): {}",
            other, url
        ))
        .into()),
    }
}

fn default_sources() -> Vec<Source> {
    vec![
        Source::new("https://www.cloudflare.com/ips-v4", Family::Ipv4),
        Source::new("https://www.cloudflare.com/ips-v6", Family::Ipv6),
        Source::new("https://uptimerobot.com/inc/files/ips/IPv4.txt", Family::Ipv4),
        Source::new("https://uptimerobot.com/inc/files/ips/IPv6.txt", Family::Ipv6),
    ]
}

fn default_allowlist() -> Vec<String> {
    vec!["192.168.50.0/24".to_string()]
}
