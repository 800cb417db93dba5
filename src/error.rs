//! Error types for nginx-allowlist.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllowlistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: String },

    #[error("Response too large: {size} bytes (max: {max} bytes)")]
    ResponseTooLarge { size: u64, max: usize },

    #[error("Response body is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    #[error("File system error: {0}")]
    FileSystem(String),
}
