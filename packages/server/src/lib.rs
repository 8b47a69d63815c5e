// Scrape Jobs - API Core
//
// Accepts batches of (URL, CSS selector) extraction tasks, processes them on a
// background worker pool, and serves the aggregate result under a job id.
// Job records live in a key-value store (Redis in production).

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
