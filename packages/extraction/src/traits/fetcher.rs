//! Fetcher trait for pluggable page retrieval.
//!
//! A `Fetcher` turns a URL into a response body or a failure. The worker
//! never inspects why a fetch failed beyond logging it; every failure is
//! reported against the task the same way.
//!
//! # Usage
//!
//! ```rust,ignore
//! use extraction::{Fetcher, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new(FetchConfig::default())?;
//! let html = fetcher.fetch("https://example.com").await?;
//! ```

use async_trait::async_trait;

use crate::error::FetchResult;

/// Retrieves the body of a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` once and return its body.
    ///
    /// Non-success statuses, transport errors and timeouts are all errors.
    async fn fetch(&self, url: &str) -> FetchResult<String>;

    /// Name of this fetcher, for logging.
    fn name(&self) -> &str;
}
