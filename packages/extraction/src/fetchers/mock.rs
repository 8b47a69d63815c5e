//! Mock fetcher for testing.
//!
//! Provides a configurable mock implementation of the Fetcher trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::Fetcher;

#[derive(Debug, Clone)]
enum MockResponse {
    Page { html: String, delay: Option<Duration> },
    Failure { status: u16 },
}

/// Mock fetcher for testing.
///
/// URLs without a configured response fail with a 404.
///
/// # Example
///
/// ```rust
/// use extraction::fetchers::MockFetcher;
///
/// let mock = MockFetcher::new()
///     .with_page("https://example.com/page1", "<div class=\"page-title\">Page 1 Title</div>")
///     .with_failure("https://example.com/down", 503);
/// ```
#[derive(Default, Clone)]
pub struct MockFetcher {
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, url: impl Into<String>, response: MockResponse) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), response);
    }

    /// Add a page that will be returned for `url`.
    pub fn add_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.insert(
            url,
            MockResponse::Page {
                html: html.into(),
                delay: None,
            },
        );
    }

    /// Builder form of [`add_page`](Self::add_page).
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.add_page(url, html);
        self
    }

    /// Return `html` for `url`, but only after `delay`.
    pub fn with_delayed_page(
        self,
        url: impl Into<String>,
        html: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.insert(
            url,
            MockResponse::Page {
                html: html.into(),
                delay: Some(delay),
            },
        );
        self
    }

    /// Fail fetches of `url` with the given HTTP status.
    pub fn with_failure(self, url: impl Into<String>, status: u16) -> Self {
        self.insert(url, MockResponse::Failure { status });
        self
    }

    /// URLs fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of fetches so far.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if a URL was fetched.
    pub fn was_fetched(&self, url: &str) -> bool {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|u| u == url)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        let response = self
            .responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned();

        match response {
            Some(MockResponse::Page { html, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(html)
            }
            Some(MockResponse::Failure { status }) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
