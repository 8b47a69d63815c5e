//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors produced by a [`Fetcher`](crate::traits::fetcher::Fetcher).
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Request did not complete in time
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Response body exceeded the configured size cap
    #[error("response body from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors produced by a [`SelectorMatcher`](crate::traits::matcher::SelectorMatcher).
#[derive(Debug, Error)]
pub enum SelectError {
    /// The selector could not be parsed
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Outcome of one failed scrape.
///
/// The `Display` output of each variant is the message recorded against the
/// task, so the wording is part of the public contract.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to fetch {url}")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Selector '{selector}' not found on {url}")]
    SelectorNotFound { selector: String, url: String },

    #[error("Invalid selector '{selector}' on {url}: {reason}")]
    InvalidSelector {
        selector: String,
        url: String,
        reason: String,
    },
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for selector matching.
pub type SelectResult<T> = std::result::Result<T, SelectError>;

/// Result type alias for a single scrape.
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_error_messages() {
        let fetch = ScrapeError::FetchFailed {
            url: "https://example.com/page1".to_string(),
            source: FetchError::Status {
                url: "https://example.com/page1".to_string(),
                status: 500,
            },
        };
        assert_eq!(fetch.to_string(), "Failed to fetch https://example.com/page1");

        let missing = ScrapeError::SelectorNotFound {
            selector: ".non-existent-selector".to_string(),
            url: "https://example.com/page2".to_string(),
        };
        assert_eq!(
            missing.to_string(),
            "Selector '.non-existent-selector' not found on https://example.com/page2"
        );
    }

    #[test]
    fn test_fetch_failure_keeps_source() {
        let err = ScrapeError::FetchFailed {
            url: "https://example.com".to_string(),
            source: FetchError::Timeout {
                url: "https://example.com".to_string(),
            },
        };
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("timeout fetching: https://example.com"));
    }
}
