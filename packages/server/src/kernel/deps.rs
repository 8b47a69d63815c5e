//! Server dependencies for job processing (using traits for testability)
//!
//! This module provides the central dependency container used by the
//! scrape-jobs domain. All external services use trait abstractions to enable
//! testing.

use std::sync::Arc;
use std::time::Duration;

use extraction::{Fetcher, Scraper, SelectorMatcher};

use crate::kernel::BaseKeyValueStore;

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to the domain (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// Key-value store holding job records (Redis in production)
    pub store: Arc<dyn BaseKeyValueStore>,
    pub fetcher: Arc<dyn Fetcher>,
    pub matcher: Arc<dyn SelectorMatcher>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        store: Arc<dyn BaseKeyValueStore>,
        fetcher: Arc<dyn Fetcher>,
        matcher: Arc<dyn SelectorMatcher>,
    ) -> Self {
        Self {
            store,
            fetcher,
            matcher,
        }
    }

    /// Build a fetch-and-extract worker over these dependencies.
    pub fn scraper(&self, timeout: Option<Duration>) -> Scraper {
        let scraper = Scraper::new(self.fetcher.clone(), self.matcher.clone());
        match timeout {
            Some(timeout) => scraper.with_timeout(timeout),
            None => scraper,
        }
    }
}
