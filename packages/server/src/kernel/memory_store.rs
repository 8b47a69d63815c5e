//! In-memory key-value store for testing and development.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::time::Instant;

use super::BaseKeyValueStore;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// In-memory key-value storage with optional per-key expiry.
///
/// Expired entries are invisible to reads and are dropped on the next write.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .map(|entries| entries.values().filter(|e| e.is_live(now)).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("memory store lock poisoned")
}

#[async_trait]
impl BaseKeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|ttl| now + ttl),
        };
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.retain(|_, e| e.is_live(now));
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).is_some_and(|e| e.is_live(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        assert!(store.exists("k").await.unwrap());

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(!store.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "one", None).await.unwrap();
        store.set("k", "two", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("two".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_silent() {
        let store = MemoryStore::new();
        assert!(store.delete("nope").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_keys_disappear() {
        let store = MemoryStore::new();
        store
            .set("short", "v", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(store.exists("short").await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!store.exists("short").await.unwrap());
        assert_eq!(store.get("short").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_drops_expired_entries() {
        let store = MemoryStore::new();
        for i in 0..10 {
            store
                .set(&format!("job:{i}"), "v", Some(Duration::from_secs(1)))
                .await
                .unwrap();
        }
        store.set("kept", "v", None).await.unwrap();
        assert_eq!(store.entries.read().unwrap().len(), 11);

        tokio::time::sleep(Duration::from_secs(2)).await;
        store.set("fresh", "v", None).await.unwrap();

        let entries = store.entries.read().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains_key("kept"));
        assert!(entries.contains_key("fresh"));
    }
}
