//! Rendering and persisting the generated nginx configuration.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use crate::aggregator::AllowBuckets;
use crate::config::{Config, Family};
use crate::fs_abstraction::FileSystem;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// The complete contents of one generated allow-list file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedConfig {
    pub generated_at: DateTime<FixedOffset>,
    pub sources: Vec<String>,
    pub custom: Vec<String>,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

impl GeneratedConfig {
    /// Assemble the file contents from the config and the collected buckets,
    /// stamped with the current local time
    pub fn new(config: &Config, buckets: AllowBuckets) -> Self {
        Self::at(Local::now().fixed_offset(), config, buckets)
    }

    /// Same as [`GeneratedConfig::new`] with an explicit timestamp
    pub fn at(generated_at: DateTime<FixedOffset>, config: &Config, buckets: AllowBuckets) -> Self {
        Self {
            generated_at,
            sources: config.source_urls(),
            custom: config.allowlist.clone(),
            ipv4: buckets.ipv4,
            ipv6: buckets.ipv6,
        }
    }

    /// Number of `allow` directives in the file
    pub fn allow_count(&self) -> usize {
        self.custom.len() + self.ipv4.len() + self.ipv6.len()
    }

    /// Render in nginx directive syntax.
    ///
    /// Sections always appear in the same order, even when empty:
    /// header, user list, IPv4, IPv6, deny rule.
    pub fn render(&self) -> String {
        let capacity = 256 + self.allow_count() * 32;
        let mut out = String::with_capacity(capacity);

        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "# This file was automatically generated on: {}",
            self.generated_at.format(TIMESTAMP_FORMAT)
        );
        out.push_str("# This file was automatically generated from the following sources:\n");
        for url in &self.sources {
            let _ = writeln!(out, "# {}", url);
        }

        push_section(&mut out, "User defined list", &self.custom);
        push_section(&mut out, &Family::Ipv4.to_string(), &self.ipv4);
        push_section(&mut out, &Family::Ipv6.to_string(), &self.ipv6);

        out.push_str("\n# Deny all remaining ips\n");
        out.push_str("deny all;");

        out
    }
}

fn push_section(out: &mut String, title: &str, entries: &[String]) {
    let _ = writeln!(out, "\n# {}", title);
    for entry in entries {
        let _ = writeln!(out, "allow {};", entry);
    }
}

/// Write the rendered configuration to `path`, replacing any existing file.
///
/// The write is atomic: on failure the previous file (if any) is untouched.
pub fn write_config(fs: &dyn FileSystem, path: &Path, config: &GeneratedConfig) -> Result<()> {
    let rendered = config.render();

    fs.write_atomic(path, rendered.as_bytes())
        .with_context(|| format!("Failed to write {:?}", path))?;

    info!("Wrote {} allow rules to {:?}", config.allow_count(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Source;
    use crate::fs_abstraction::{MockFileSystem, RealFileSystem};
    use std::io;
    use tempfile::TempDir;

    fn timestamp() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-10-19T08:30:00+02:00").unwrap()
    }

    fn sample_config() -> Config {
        Config {
            sources: vec![
                Source::new("https://a.example/ips-v4", Family::Ipv4),
                Source::new("https://b.example/ips-v6", Family::Ipv6),
            ],
            allowlist: vec!["192.168.50.0/24".to_string()],
            ..Config::default()
        }
    }

    fn sample_buckets() -> AllowBuckets {
        AllowBuckets {
            ipv4: vec!["1.2.3.0/24".to_string(), "5.6.7.0/24".to_string()],
            ipv6: vec!["2001:db8::/32".to_string()],
        }
    }

    #[test]
    fn test_render_layout() {
        let generated = GeneratedConfig::at(timestamp(), &sample_config(), sample_buckets());

        let expected = "\
# This file was automatically generated on: 2026-10-19 08:30:00 +0200
# This file was automatically generated from the following sources:
# https://a.example/ips-v4
# https://b.example/ips-v6

# User defined list
allow 192.168.50.0/24;

# IPv4
allow 1.2.3.0/24;
allow 5.6.7.0/24;

# IPv6
allow 2001:db8::/32;

# Deny all remaining ips
deny all;";

        assert_eq!(generated.render(), expected);
    }

    #[test]
    fn test_render_empty_buckets_keeps_sections() {
        let generated =
            GeneratedConfig::at(timestamp(), &sample_config(), AllowBuckets::default());
        let rendered = generated.render();

        assert!(rendered.contains("# User defined list\nallow 192.168.50.0/24;\n"));
        assert!(rendered.contains("\n# IPv4\n\n# IPv6\n\n# Deny all remaining ips\n"));
        assert!(rendered.ends_with("deny all;"));
        assert_eq!(generated.allow_count(), 1);
    }

    #[test]
    fn test_render_is_deterministic_for_same_input() {
        let a = GeneratedConfig::at(timestamp(), &sample_config(), sample_buckets());
        let b = GeneratedConfig::at(timestamp(), &sample_config(), sample_buckets());
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn test_render_differs_only_in_timestamp() {
        let later = DateTime::parse_from_rfc3339("2026-10-20T09:00:00+02:00").unwrap();
        let a = GeneratedConfig::at(timestamp(), &sample_config(), sample_buckets()).render();
        let b = GeneratedConfig::at(later, &sample_config(), sample_buckets()).render();

        let a_lines: Vec<_> = a.lines().collect();
        let b_lines: Vec<_> = b.lines().collect();
        assert_ne!(a_lines[0], b_lines[0]);
        assert_eq!(a_lines[1..], b_lines[1..]);
    }

    #[test]
    fn test_new_uses_current_time() {
        let before = Local::now().fixed_offset();
        let generated = GeneratedConfig::new(&sample_config(), sample_buckets());
        assert!(generated.generated_at >= before);
    }

    #[test]
    fn test_write_config_to_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("allow.conf");
        let generated = GeneratedConfig::at(timestamp(), &sample_config(), sample_buckets());

        write_config(&RealFileSystem, &path, &generated).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), generated.render());
    }

    #[test]
    fn test_write_config_overwrites_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("allow.conf");
        std::fs::write(&path, "allow 0.0.0.0/0;\n".repeat(100)).unwrap();

        let generated =
            GeneratedConfig::at(timestamp(), &sample_config(), AllowBuckets::default());
        write_config(&RealFileSystem, &path, &generated).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("0.0.0.0/0"));
        assert!(content.ends_with("deny all;"));
    }

    #[test]
    fn test_write_config_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing/allow.conf");
        let generated = GeneratedConfig::at(timestamp(), &sample_config(), sample_buckets());

        let err = write_config(&RealFileSystem, &path, &generated).unwrap_err();
        assert!(err.to_string().contains("Failed to write"));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_config_propagates_fs_error() {
        let mut mock = MockFileSystem::new();
        mock.expect_write_atomic()
            .withf(|p, c| p == Path::new("/etc/nginx/conf/allow.conf") && c.ends_with(b"deny all;"))
            .times(1)
            .returning(|_, _| {
                Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "read-only file system",
                ))
            });

        let generated = GeneratedConfig::at(timestamp(), &sample_config(), sample_buckets());
        let result = write_config(&mock, Path::new("/etc/nginx/conf/allow.conf"), &generated);
        assert!(result.is_err());
    }
}
