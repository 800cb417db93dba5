//! Init command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::fs_abstraction::{real_fs, FileSystem};

/// Run the init command
pub fn run(force: bool, config_path: &Path) -> Result<()> {
    execute(real_fs(), config_path, force)?;
    println!("[OK] Default configuration written to {}", config_path.display());
    Ok(())
}

/// Write the commented default configuration to `path`
pub fn execute(fs: &dyn FileSystem, path: &Path, force: bool) -> Result<()> {
    if fs.exists(path) && !force {
        anyhow::bail!(
            "Config file {:?} already exists. Use --force to overwrite it.",
            path
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs.create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    fs.write_atomic(path, Config::generate_default_yaml().as_bytes())
        .with_context(|| format!("Failed to write config file {:?}", path))?;

    info!("Created {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_abstraction::RealFileSystem;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("etc/config.yaml");

        execute(&RealFileSystem, &path, false).unwrap();

        let config = Config::load(&RealFileSystem, &path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "allowlist: []\n").unwrap();

        let err = execute(&RealFileSystem, &path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "allowlist: []\n");
    }

    #[test]
    fn test_init_force_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "allowlist: []\n").unwrap();

        execute(&RealFileSystem, &path, true).unwrap();
        assert_eq!(Config::load(&RealFileSystem, &path).unwrap(), Config::default());
    }
}
