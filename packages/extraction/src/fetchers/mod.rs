//! Fetcher implementations.
//!
//! # Available Fetchers
//!
//! - `HttpFetcher` - Single HTTP GET via reqwest
//! - `MockFetcher` - For testing

mod http;
mod mock;

pub use http::{FetchConfig, HttpFetcher};
pub use mock::MockFetcher;

// Re-export from traits for convenience
pub use crate::traits::fetcher::Fetcher;
