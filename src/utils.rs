//! Common utility functions used across modules.
//!
//! - [`format_count`] - Format range counts with K/M suffix (1.5K, 2.3M)
//! - [`truncate`] - Shorten source URLs with an ellipsis for table output

/// Format a range count with K/M suffix for log lines and summaries.
///
/// # Examples
/// ```
/// use nginx_allowlist::utils::format_count;
/// // A typical IPv4 list from one provider
/// assert_eq!(format_count(15), "15");
/// // A large cloud provider feed
/// assert_eq!(format_count(8_400), "8.4K");
/// assert_eq!(format_count(1_500_000), "1.5M");
/// ```
pub fn format_count(count: usize) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Truncate a source URL (or any string) to a maximum length in
/// characters, adding "..." if truncated.
///
/// # Examples
/// ```
/// use nginx_allowlist::utils::truncate;
/// assert_eq!(truncate("https://a.example/v4", 20), "https://a.example/v4");
/// assert_eq!(
///     truncate("https://www.cloudflare.com/ips-v4", 20),
///     "https://www.cloud..."
/// );
/// ```
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(15), "15");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1.0K");
        assert_eq!(format_count(1500), "1.5K");
        assert_eq!(format_count(1_000_000), "1.0M");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("https://a.example/v4", 20), "https://a.example/v4");
        assert_eq!(
            truncate("https://www.cloudflare.com/ips-v6", 20),
            "https://www.cloud..."
        );
        assert_eq!(truncate("https://a.example/v4", 3), "...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }
}
