//! Output location resolution.
//!
//! Where nginx keeps its configuration depends on the platform. The
//! pipeline only sees the [`OutputLocator`] trait, so tests and explicit
//! configuration can bypass the platform lookup entirely.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

#[cfg(test)]
use mockall::automock;

use crate::error::AllowlistError;
use crate::fs_abstraction::FileSystem;

/// Resolves the directory the generated file is written to
#[cfg_attr(test, automock)]
pub trait OutputLocator: Send + Sync {
    fn output_dir(&self) -> Result<PathBuf, AllowlistError>;
}

/// nginx configuration directory for the given operating system
#[derive(Debug, Clone)]
pub struct PlatformLocator {
    os: String,
}

impl PlatformLocator {
    /// Locator for the platform this binary was built for
    pub fn current() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    pub fn for_os(os: &str) -> Self {
        Self { os: os.to_string() }
    }
}

impl OutputLocator for PlatformLocator {
    fn output_dir(&self) -> Result<PathBuf, AllowlistError> {
        match self.os.as_str() {
            "linux" => Ok(PathBuf::from("/etc/nginx/conf/")),
            "windows" => Ok(PathBuf::from("C:/nginx/conf/")),
            other => Err(AllowlistError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// A directory chosen explicitly by configuration or command line
#[derive(Debug, Clone)]
pub struct FixedLocator(pub PathBuf);

impl OutputLocator for FixedLocator {
    fn output_dir(&self) -> Result<PathBuf, AllowlistError> {
        Ok(self.0.clone())
    }
}

/// Make sure the output directory exists, creating it if needed
pub fn prepare_output_dir(fs: &dyn FileSystem, dir: &Path) -> Result<()> {
    if fs.exists(dir) {
        return Ok(());
    }

    info!("Creating output directory {:?}", dir);
    fs.create_dir_all(dir)
        .map_err(|e| AllowlistError::FileSystem(e.to_string()))
        .with_context(|| format!("Failed to create directory {:?}", dir))
}
