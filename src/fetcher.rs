//! HTTP fetcher for downloading IP range lists.
//!
//! One fetch per source, no retries. A failed fetch is an `Err` for that
//! source only; the caller decides how to report it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::config::Source;
use crate::error::AllowlistError;
use crate::utils::format_count;

/// Transport seam between the fetcher and the network.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ListClient: Send + Sync {
    /// GET `url` and return the body as text. Non-success statuses are errors.
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// reqwest-backed client used in production
pub struct HttpClient {
    client: Client,
    max_size: usize,
}

impl HttpClient {
    /// Create a client with a per-request timeout and body size cap
    pub fn new(timeout: Duration, max_size: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("nginx-allowlist/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, max_size })
    }
}

// Note: Default is intentionally not implemented for HttpClient
// because new() can fail and we want explicit error handling.

#[async_trait]
impl ListClient for HttpClient {
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(AllowlistError::HttpStatus {
                url: url.to_string(),
                status: response.status().to_string(),
            }
            .into());
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_size as u64 {
                return Err(AllowlistError::ResponseTooLarge {
                    size: content_length,
                    max: self.max_size,
                }
                .into());
            }
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read response body")?;

        // Content-Length can be absent (chunked) or wrong
        if body.len() > self.max_size {
            return Err(AllowlistError::ResponseTooLarge {
                size: body.len() as u64,
                max: self.max_size,
            }
            .into());
        }

        // Lines are passed through verbatim, so undecodable bytes fail the source
        let text = String::from_utf8(body.to_vec())
            .map_err(|e| AllowlistError::InvalidEncoding(e.utf8_error().to_string()))?;

        Ok(text)
    }
}

/// Lines produced by one successful fetch, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBatch {
    lines: Vec<String>,
}

impl LineBatch {
    /// Split a response body into lines.
    ///
    /// The final newline does not produce an empty trailing line and a
    /// trailing `\r` is dropped from each line. Everything else is kept verbatim.
    pub fn from_body(body: &str) -> Self {
        let body = body.strip_suffix('\n').unwrap_or(body);
        if body.is_empty() {
            return Self::default();
        }

        let lines = body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }

    #[cfg(test)]
    pub(crate) fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl From<Vec<String>> for LineBatch {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

/// Fetches a single source through a [`ListClient`]
pub struct Fetcher {
    client: Box<dyn ListClient>,
}

impl Fetcher {
    pub fn new(client: Box<dyn ListClient>) -> Self {
        Self { client }
    }

    /// Build a fetcher on the production HTTP client
    pub fn http(timeout: Duration, max_size: usize) -> Result<Self> {
        Ok(Self::new(Box::new(HttpClient::new(timeout, max_size)?)))
    }

    /// Fetch one source and split it into lines
    pub async fn fetch(&self, source: &Source) -> Result<LineBatch> {
        debug!("Fetching {} ({})...", source.url, source.family);

        let body = self
            .client
            .get_text(&source.url)
            .await
            .with_context(|| format!("Failed to fetch {}", source.url))?;

        let batch = LineBatch::from_body(&body);

        info!(
            "Fetched {} - {} {} ranges",
            source.url,
            format_count(batch.len()),
            source.family
        );

        Ok(batch)
    }
}
