//! Fetch-and-Extract Library
//!
//! Given a URL and a CSS selector, fetch the page once and return the text of
//! the first matching element.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use extraction::{CssMatcher, FetchConfig, HttpFetcher, Scraper};
//!
//! let fetcher = HttpFetcher::new(FetchConfig::default())?;
//! let scraper = Scraper::new(Arc::new(fetcher), Arc::new(CssMatcher::new()));
//!
//! let title = scraper.scrape("https://example.com", "h1").await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Capability traits (Fetcher, SelectorMatcher)
//! - [`fetchers`] - Fetcher implementations (HttpFetcher, MockFetcher)
//! - [`matchers`] - Selector matcher implementations (CssMatcher)
//! - [`worker`] - The Scraper combining both

pub mod error;
pub mod fetchers;
pub mod matchers;
pub mod traits;
pub mod worker;

// Re-export core types at crate root
pub use error::{
    FetchError, FetchResult, ScrapeError, ScrapeResult, SelectError, SelectResult,
};
pub use fetchers::{FetchConfig, HttpFetcher, MockFetcher};
pub use matchers::CssMatcher;
pub use worker::Scraper;
pub use traits::{fetcher::Fetcher, matcher::SelectorMatcher};
