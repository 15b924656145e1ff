//! Error types for the RTVE scraper
//!
//! Extraction failures are local: callers log them and move on to the next
//! entry. Only transport failures of a top-level fetch are meant to reach
//! the user.

use thiserror::Error;

/// Error type for RTVE scraper operations
#[derive(Error, Debug)]
pub enum RtveError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML or an embedded blob
    #[error("Failed to parse: {0}")]
    ParseError(String),

    /// A required field was absent from a listing entry
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// API response body was not valid JSON
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// API response was valid JSON but lacked the expected structure
    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Client configuration was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Requested resource was not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Writing delimited output failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for RTVE scraper operations
pub type Result<T> = std::result::Result<T, RtveError>;
