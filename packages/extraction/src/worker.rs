//! Fetch-and-extract worker.
//!
//! [`Scraper::scrape`] performs exactly one fetch and one selector match. It
//! holds no state between calls, so one instance can serve any number of
//! concurrent tasks.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{FetchError, ScrapeError, ScrapeResult, SelectError};
use crate::traits::fetcher::Fetcher;
use crate::traits::matcher::SelectorMatcher;

pub struct Scraper {
    fetcher: Arc<dyn Fetcher>,
    matcher: Arc<dyn SelectorMatcher>,
    timeout: Option<Duration>,
}

impl Scraper {
    pub fn new(fetcher: Arc<dyn Fetcher>, matcher: Arc<dyn SelectorMatcher>) -> Self {
        Self {
            fetcher,
            matcher,
            timeout: None,
        }
    }

    /// Bound each fetch. A fetch that runs past `timeout` is a fetch failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetcher.fetch(url))
                .await
                .map_err(|_| FetchError::Timeout {
                    url: url.to_string(),
                })?,
            None => self.fetcher.fetch(url).await,
        }
    }

    /// Fetch `url` and return the text of the first element matching `selector`.
    pub async fn scrape(&self, url: &str, selector: &str) -> ScrapeResult<String> {
        let html = self.fetch(url).await.map_err(|source| {
            warn!(
                url = %url,
                fetcher = self.fetcher.name(),
                error = %source,
                "fetch failed"
            );
            ScrapeError::FetchFailed {
                url: url.to_string(),
                source,
            }
        })?;

        match self.matcher.select_text(&html, selector) {
            Ok(Some(text)) => {
                debug!(url = %url, selector = %selector, "selector matched");
                Ok(text)
            }
            Ok(None) => Err(ScrapeError::SelectorNotFound {
                selector: selector.to_string(),
                url: url.to_string(),
            }),
            Err(SelectError::InvalidSelector { reason, .. }) => Err(ScrapeError::InvalidSelector {
                selector: selector.to_string(),
                url: url.to_string(),
                reason,
            }),
        }
    }
}
