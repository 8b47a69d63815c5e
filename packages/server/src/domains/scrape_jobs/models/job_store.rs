//! Job record persistence over the key-value store.
//!
//! Records are stored as JSON under `job:{id}`. Writes overwrite
//! unconditionally; there is no versioning.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use uuid::Uuid;

use super::ScrapeJob;
use crate::kernel::BaseKeyValueStore;

#[derive(Clone)]
pub struct JobStore {
    kv: Arc<dyn BaseKeyValueStore>,
    ttl: Option<Duration>,
}

pub fn job_key(id: Uuid) -> String {
    format!("job:{id}")
}

impl JobStore {
    pub fn new(kv: Arc<dyn BaseKeyValueStore>) -> Self {
        Self { kv, ttl: None }
    }

    /// Expire records `ttl` after their last write.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn write(&self, job: &ScrapeJob) -> Result<()> {
        let payload = serde_json::to_string(job).context("Failed to serialize job record")?;
        self.kv.set(&job_key(job.id), &payload, self.ttl).await
    }

    pub async fn read(&self, id: Uuid) -> Result<Option<ScrapeJob>> {
        let Some(payload) = self.kv.get(&job_key(id)).await? else {
            return Ok(None);
        };

        let job = serde_json::from_str(&payload)
            .with_context(|| format!("Corrupt job record for {id}"))?;
        Ok(Some(job))
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        self.kv.exists(&job_key(id)).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.kv.delete(&job_key(id)).await
    }
}
