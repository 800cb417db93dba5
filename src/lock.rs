//! File-based locking to prevent concurrent generation.
//!
//! Uses flock-style advisory locking on a `<output>.lock` file next to the
//! generated configuration, so two runs never race on the same output.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// A guard that holds an exclusive lock for one output file.
/// The lock is automatically released when the guard is dropped.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
}

impl LockGuard {
    /// Attempt to acquire an exclusive lock for `output`.
    /// Returns an error if another run holds it.
    pub fn acquire(output: &Path) -> Result<Self> {
        let path = lock_path(output);

        // Open or create without truncating, avoiding a race between create and lock
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {:?}", path))?;

        file.try_lock_exclusive().map_err(|_| {
            anyhow::anyhow!(
                "Another nginx-allowlist run is writing {:?}.\n\
                 Wait for it to complete, or remove the lock file: {:?}",
                output,
                path
            )
        })?;

        Ok(Self { _file: file })
    }
}

fn lock_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("nginx-allowlist"));
    name.push(".lock");
    output.with_file_name(name)
}

// Lock is automatically released when file is closed (on drop)
