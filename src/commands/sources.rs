//! Sources command implementation.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::fs_abstraction::real_fs;
use crate::utils::truncate;

/// Run the sources command
pub fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(real_fs(), config_path)?;
    print!("{}", render(&config));
    Ok(())
}

/// Format the configured sources and custom allowlist as a table
pub fn render(config: &Config) -> String {
    let mut out = String::new();

    out.push_str(" FAMILY  URL\n");
    out.push_str(" ─────── ────────────────────────────────────────────────────────\n");
    for source in &config.sources {
        out.push_str(&format!(" {:<7} {}\n", source.family, truncate(&source.url, 56)));
    }
    if config.sources.is_empty() {
        out.push_str(" (no sources configured)\n");
    }

    out.push('\n');
    out.push_str(&format!(" User defined list: {} entries\n", config.allowlist.len()));
    for entry in &config.allowlist {
        out.push_str(&format!("   {}\n", entry));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Family, Source};

    #[test]
    fn test_render_sources() {
        let config = Config {
            sources: vec![
                Source::new("https://a.example/v4", Family::Ipv4),
                Source::new("https://b.example/v6", Family::Ipv6),
            ],
            allowlist: vec!["10.0.0.0/8".to_string()],
            ..Config::default()
        };

        let out = render(&config);
        assert!(out.contains(" IPv4    https://a.example/v4\n"));
        assert!(out.contains(" IPv6    https://b.example/v6\n"));
        assert!(out.contains("User defined list: 1 entries"));
        assert!(out.contains("   10.0.0.0/8\n"));
    }

    #[test]
    fn test_render_no_sources() {
        let config = Config {
            sources: vec![],
            ..Config::default()
        };
        assert!(render(&config).contains("(no sources configured)"));
    }
}
