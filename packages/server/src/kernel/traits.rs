// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Job semantics live in domains/scrape_jobs on top of these traits.
//
// Naming convention: Base* for trait names (e.g., BaseKeyValueStore)

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// Key-Value Store Trait (Infrastructure)
// =============================================================================

/// Single-key get/set/delete/exists over string values.
///
/// Each call is atomic on its own key; nothing spans keys or calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BaseKeyValueStore: Send + Sync {
    /// Get the value stored at `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` at `key`, replacing any existing value.
    /// With a `ttl` the key expires after that long.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Remove `key`. Silent when the key does not exist.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether `key` currently holds a value
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Round-trip to the backend (health checks)
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
