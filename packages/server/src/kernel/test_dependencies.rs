// TestDependencies - mock implementations for testing
//
// Provides an in-memory store and a canned-page fetcher that can be turned
// into ServerDeps for tests.

use std::sync::Arc;

use extraction::{CssMatcher, MockFetcher};

use super::{BaseKeyValueStore, MemoryStore, ServerDeps};

pub struct TestDependencies {
    pub store: Arc<MemoryStore>,
    pub fetcher: MockFetcher,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            fetcher: MockFetcher::new(),
        }
    }

    /// Set a mock fetcher
    pub fn mock_fetcher(mut self, fetcher: MockFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Serve `html` for `url`
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.fetcher.add_page(url, html);
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self) -> ServerDeps {
        let store: Arc<dyn BaseKeyValueStore> = self.store;
        ServerDeps::new(store, Arc::new(self.fetcher), Arc::new(CssMatcher::new()))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
