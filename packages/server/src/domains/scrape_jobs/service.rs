//! Scrape job lifecycle.
//!
//! `ScrapeJobService` creates job records, schedules them on the dispatch
//! queue, runs the single processing pass and serves reads and deletes. It
//! never caches a record: every call goes back to the store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use extraction::{ScrapeResult, Scraper};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::domains::scrape_jobs::models::{JobStatus, JobStore, ScrapeJob, ScrapeTask};
use crate::kernel::jobs::{EnqueueResult, JobHandler, JobQueue};
use crate::kernel::ServerDeps;

/// Tunables for job processing.
#[derive(Debug, Clone)]
pub struct ScrapeJobSettings {
    /// Tasks of one job fetched at once
    pub task_concurrency: usize,
    /// Upper bound on each fetch
    pub fetch_timeout: Option<Duration>,
    /// Records expire this long after their last write
    pub job_ttl: Option<Duration>,
}

impl Default for ScrapeJobSettings {
    fn default() -> Self {
        Self {
            task_concurrency: 8,
            fetch_timeout: Some(Duration::from_secs(30)),
            job_ttl: None,
        }
    }
}

impl From<&Config> for ScrapeJobSettings {
    fn from(config: &Config) -> Self {
        Self {
            task_concurrency: config.task_concurrency,
            fetch_timeout: Some(config.fetch_timeout()),
            job_ttl: config.job_ttl(),
        }
    }
}

/// What a processing pass did with a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Tasks were run and the terminal record was written
    Processed(JobStatus),
    /// The record was already terminal; nothing ran
    AlreadyFinished(JobStatus),
    /// No record existed when processing started
    Missing,
    /// The record was deleted while tasks were running; nothing was written
    Deleted,
}

#[derive(Clone)]
pub struct ScrapeJobService {
    jobs: JobStore,
    scraper: Arc<Scraper>,
    queue: Arc<dyn JobQueue>,
    task_concurrency: usize,
}

impl ScrapeJobService {
    pub fn new(deps: &ServerDeps, queue: Arc<dyn JobQueue>, settings: ScrapeJobSettings) -> Self {
        Self {
            jobs: JobStore::new(deps.store.clone()).with_ttl(settings.job_ttl),
            scraper: Arc::new(deps.scraper(settings.fetch_timeout)),
            queue,
            task_concurrency: settings.task_concurrency.max(1),
        }
    }

    /// Store a pending job for `tasks` and schedule its processing.
    ///
    /// Returns as soon as the job is queued. If it cannot be queued the
    /// pending record is removed again. `tasks` must already be validated
    /// and non-empty.
    pub async fn create_job(&self, tasks: Vec<ScrapeTask>) -> Result<Uuid> {
        let job = ScrapeJob::new(tasks);

        self.jobs
            .write(&job)
            .await
            .context("Failed to store new job")?;

        let scheduled = match self.queue.enqueue(job.id).await {
            Ok(scheduled) => scheduled,
            Err(e) => {
                // Nothing would ever process it
                if let Err(cleanup) = self.jobs.delete(job.id).await {
                    warn!(job_id = %job.id, error = %cleanup, "failed to remove unscheduled job");
                }
                return Err(e.context("Failed to schedule job"));
            }
        };

        match scheduled {
            EnqueueResult::Created(id) => {
                info!(job_id = %id, tasks = job.tasks.len(), "job created");
            }
            EnqueueResult::Duplicate(id) => {
                warn!(job_id = %id, "job was already scheduled");
            }
        }

        Ok(job.id)
    }

    /// Run every task of job `id` and write the terminal record.
    ///
    /// One task failing never stops the others. Results and errors are
    /// kept in task order.
    pub async fn process_job(&self, id: Uuid) -> Result<ProcessOutcome> {
        let Some(mut job) = self.jobs.read(id).await? else {
            warn!(job_id = %id, "job not found, skipping");
            return Ok(ProcessOutcome::Missing);
        };

        if job.is_terminal() {
            info!(job_id = %id, status = %job.status, "job already processed, skipping");
            return Ok(ProcessOutcome::AlreadyFinished(job.status));
        }

        debug!(job_id = %id, tasks = job.tasks.len(), "processing job");

        let scraper: &Scraper = &self.scraper;
        let fetches: Vec<_> = job
            .tasks
            .iter()
            .map(move |task| scraper.scrape(&task.url, task.selector()))
            .collect();
        let outcomes: Vec<ScrapeResult<String>> = stream::iter(fetches)
            .buffered(self.task_concurrency)
            .collect()
            .await;

        // Do not bring back a record that was deleted mid-run
        if !self.jobs.exists(id).await? {
            warn!(job_id = %id, "job deleted during processing, discarding results");
            return Ok(ProcessOutcome::Deleted);
        }

        job.complete_with(outcomes);
        self.jobs
            .write(&job)
            .await
            .with_context(|| format!("Failed to store results for job {id}"))?;

        info!(
            job_id = %id,
            status = %job.status,
            scraped = job.scraped_data.len(),
            errors = job.errors.len(),
            "job processed"
        );

        Ok(ProcessOutcome::Processed(job.status))
    }

    pub async fn get_job_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>> {
        self.jobs.read(id).await
    }

    /// Delete job `id`. Returns false when there was nothing to delete.
    pub async fn delete_job_by_id(&self, id: Uuid) -> Result<bool> {
        if !self.jobs.exists(id).await? {
            return Ok(false);
        }

        self.jobs.delete(id).await?;
        info!(job_id = %id, "job deleted");
        Ok(true)
    }
}

#[async_trait]
impl JobHandler for ScrapeJobService {
    async fn handle(&self, job_id: Uuid) -> Result<()> {
        self.process_job(job_id).await.map(|_| ())
    }
}
