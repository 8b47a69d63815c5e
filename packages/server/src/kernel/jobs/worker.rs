//! Job worker service for processing background jobs.
//!
//! The `JobWorker` is a long-running service that:
//! - Receives job ids from the dispatch queue
//! - Runs up to `max_concurrent_jobs` of them at once via a `JobHandler`
//! - Releases each id back to the queue when its pass finishes
//! - Drains running jobs on shutdown, aborting them after a timeout
//!
//! # Architecture
//!
//! ```text
//! create_job
//!     │
//!     └─► ChannelJobQueue.enqueue(id)
//!
//! JobWorker
//!     │
//!     ├─► JobReceiver.recv()           (waits for a free slot first)
//!     ├─► JobHandler.handle(id)        (spawned into a JoinSet)
//!     └─► ClaimedJob dropped           (id released)
//! ```
//!
//! Processing failures are logged, never retried.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::queue::JobReceiver;

/// Configuration for the job worker.
#[derive(Debug, Clone)]
pub struct JobWorkerConfig {
    /// Maximum number of jobs processed at once
    pub max_concurrent_jobs: usize,
    /// How long running jobs get to finish after shutdown is requested
    pub shutdown_timeout: Duration,
    /// Worker ID for this instance
    pub worker_id: String,
}

impl Default for JobWorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 4,
            shutdown_timeout: Duration::from_secs(30),
            worker_id: format!("worker-{}", Uuid::new_v4()),
        }
    }
}

impl JobWorkerConfig {
    /// Create a new config with a specific worker ID.
    pub fn with_worker_id(worker_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            ..Default::default()
        }
    }
}

/// Executes one processing pass for a job id.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job_id: Uuid) -> Result<()>;
}

/// A job worker that processes job ids from the dispatch queue.
pub struct JobWorker {
    receiver: JobReceiver,
    handler: Arc<dyn JobHandler>,
    config: JobWorkerConfig,
}

impl JobWorker {
    /// Create with custom configuration.
    pub fn with_config(
        receiver: JobReceiver,
        handler: Arc<dyn JobHandler>,
        config: JobWorkerConfig,
    ) -> Self {
        Self {
            receiver,
            handler,
            config,
        }
    }

    /// Spawn the worker as a background task.
    pub fn spawn(self) -> WorkerHandle {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let handle = tokio::spawn(async move { self.run(token).await });
        WorkerHandle { shutdown, handle }
    }

    /// Run until `shutdown` is cancelled or the queue closes.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let JobWorker {
            mut receiver,
            handler,
            config,
        } = self;

        info!(
            worker_id = %config.worker_id,
            max_concurrent_jobs = config.max_concurrent_jobs,
            "job worker starting"
        );

        let slots = Arc::new(Semaphore::new(config.max_concurrent_jobs.max(1)));
        let mut running: JoinSet<()> = JoinSet::new();

        loop {
            let permit = tokio::select! {
                _ = shutdown.cancelled() => break,
                Some(result) = running.join_next(), if !running.is_empty() => {
                    log_join_result(result);
                    continue;
                }
                permit = slots.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let job = tokio::select! {
                _ = shutdown.cancelled() => break,
                Some(result) = running.join_next(), if !running.is_empty() => {
                    log_join_result(result);
                    continue;
                }
                job = receiver.recv() => match job {
                    Some(job) => job,
                    None => {
                        debug!("job queue closed");
                        break;
                    }
                },
            };

            let handler = handler.clone();
            running.spawn(async move {
                let _permit = permit;
                let job_id = job.id;

                debug!(job_id = %job_id, "processing job");
                if let Err(e) = handler.handle(job_id).await {
                    error!(job_id = %job_id, error = %e, "job processing failed");
                }

                // Releases the id for the queue
                drop(job);
            });
        }

        if !running.is_empty() {
            info!(count = running.len(), "waiting for running jobs to complete");

            let drain = async {
                while let Some(result) = running.join_next().await {
                    log_join_result(result);
                }
            };

            if tokio::time::timeout(config.shutdown_timeout, drain)
                .await
                .is_err()
            {
                warn!(count = running.len(), "shutdown timeout elapsed, aborting running jobs");
                running.abort_all();
                while running.join_next().await.is_some() {}
            }
        }

        info!(worker_id = %config.worker_id, "job worker stopped");
        Ok(())
    }
}

fn log_join_result(result: std::result::Result<(), JoinError>) {
    if let Err(e) = result {
        if e.is_panic() {
            error!(error = %e, "job task panicked");
        } else {
            debug!(error = %e, "job task cancelled");
        }
    }
}

/// Handle to a spawned [`JobWorker`].
pub struct WorkerHandle {
    shutdown: CancellationToken,
    handle: JoinHandle<Result<()>>,
}

impl WorkerHandle {
    /// Request shutdown and wait for the worker to drain.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown.cancel();
        self.handle.await?
    }
}
