//! # nginx-allowlist - Allow-list generator for nginx
//!
//! Fetches published IP range lists (Cloudflare, UptimeRobot, ...) in
//! parallel, merges them with a locally defined allowlist and writes an
//! nginx configuration snippet that allows those ranges and denies
//! everything else.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      nginx-allowlist                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: generate, sources, init, version           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Sources (URL + family), user allowlist, output file  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Coordinator (tokio JoinSet, one task per source)           │
//! │    ├── Fetcher (reqwest + rustls, ListClient trait)         │
//! │    └── Aggregator (Mutex-guarded IPv4 / IPv6 buckets)       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Writer (atomic temp file + rename)                         │
//! │    └── Output location via OutputLocator (platform / fixed) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use nginx_allowlist::config::Config;
//! use nginx_allowlist::coordinator::Coordinator;
//! use nginx_allowlist::fetcher::Fetcher;
//! use nginx_allowlist::fs_abstraction::real_fs;
//! use nginx_allowlist::writer::{write_config, GeneratedConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!
//!     // Fetch every source in parallel, failures are skipped
//!     let fetcher = Fetcher::http(Duration::from_secs(30), 10 * 1024 * 1024)?;
//!     let collection = Coordinator::new(config.sources.clone(), fetcher)
//!         .collect()
//!         .await;
//!
//!     // Write the merged result
//!     let generated = GeneratedConfig::new(&config, collection.buckets);
//!     write_config(real_fs(), "/tmp/allow.conf".as_ref(), &generated)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Output ordering
//!
//! Sections are always written in the same order and lines from one
//! source keep their order. Sources of the same family are fetched
//! concurrently, so the order *between* them follows completion order
//! and may differ from run to run.
//!
//! ## Modules
//!
//! - [`aggregator`] - Thread-safe per-family accumulation
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`coordinator`] - Parallel fetch and barrier
//! - [`error`] - Classified error types
//! - [`fetcher`] - HTTP client and line splitting
//! - [`fs_abstraction`] - Filesystem trait for testability
//! - [`lock`] - File locking against concurrent runs
//! - [`platform`] - Output directory resolution
//! - [`utils`] - Formatting helpers
//! - [`writer`] - Rendering and atomic persistence

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod fs_abstraction;
pub mod lock;
pub mod platform;
pub mod utils;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::{Config, Family, Source};
pub use error::AllowlistError;
