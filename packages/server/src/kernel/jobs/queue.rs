//! In-process dispatch queue for background job processing.
//!
//! The create path pushes job ids into a bounded channel; the [`JobWorker`]
//! drains it. Enqueueing never waits: a full channel is an error. An id is tracked from the moment it is enqueued until its
//! processing finishes, and the queue refuses to schedule a tracked id a
//! second time. This is what guarantees at most one in-flight processing
//! pass per job.
//!
//! [`JobWorker`]: super::JobWorker

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;
use uuid::Uuid;

/// Result type for enqueue operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueResult {
    /// Job was scheduled for processing
    Created(Uuid),
    /// Job is already queued or running; nothing was scheduled
    Duplicate(Uuid),
}

impl EnqueueResult {
    /// Get the job ID regardless of whether it was created or duplicate
    pub fn job_id(&self) -> Uuid {
        match self {
            EnqueueResult::Created(id) | EnqueueResult::Duplicate(id) => *id,
        }
    }

    /// Returns true if this was a newly scheduled job
    pub fn is_created(&self) -> bool {
        matches!(self, EnqueueResult::Created(_))
    }
}

/// Why a job could not be scheduled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnqueueError {
    #[error("job queue is full")]
    Full,
    #[error("job worker has shut down")]
    Closed,
}

/// Scheduling boundary between the create path and background processing.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Schedule one processing pass for `job_id`.
    async fn enqueue(&self, job_id: Uuid) -> Result<EnqueueResult>;
}

/// Ids that are queued or being processed.
#[derive(Clone, Default)]
struct InFlight(Arc<Mutex<HashSet<Uuid>>>);

impl InFlight {
    fn insert(&self, id: Uuid) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id)
    }

    fn remove(&self, id: &Uuid) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
    }

    fn contains(&self, id: &Uuid) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Create a connected queue/receiver pair with room for `capacity` pending ids.
pub fn channel(capacity: usize) -> (ChannelJobQueue, JobReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    let in_flight = InFlight::default();
    (
        ChannelJobQueue {
            tx,
            in_flight: in_flight.clone(),
        },
        JobReceiver { rx, in_flight },
    )
}

/// Sending half of the dispatch queue.
#[derive(Clone)]
pub struct ChannelJobQueue {
    tx: mpsc::Sender<Uuid>,
    in_flight: InFlight,
}

impl ChannelJobQueue {
    /// Whether `job_id` is currently queued or running.
    pub fn is_in_flight(&self, job_id: &Uuid) -> bool {
        self.in_flight.contains(job_id)
    }

    /// Number of jobs queued or running.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

#[async_trait]
impl JobQueue for ChannelJobQueue {
    async fn enqueue(&self, job_id: Uuid) -> Result<EnqueueResult> {
        if !self.in_flight.insert(job_id) {
            debug!(job_id = %job_id, "job already queued or running");
            return Ok(EnqueueResult::Duplicate(job_id));
        }

        if let Err(e) = self.tx.try_send(job_id) {
            self.in_flight.remove(&job_id);
            return Err(match e {
                TrySendError::Full(_) => EnqueueError::Full,
                TrySendError::Closed(_) => EnqueueError::Closed,
            }
            .into());
        }

        debug!(job_id = %job_id, "job enqueued");
        Ok(EnqueueResult::Created(job_id))
    }
}

/// Receiving half of the dispatch queue, owned by the worker.
pub struct JobReceiver {
    rx: mpsc::Receiver<Uuid>,
    in_flight: InFlight,
}

impl JobReceiver {
    /// Wait for the next job. Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<ClaimedJob> {
        let id = self.rx.recv().await?;
        Some(ClaimedJob {
            id,
            in_flight: self.in_flight.clone(),
        })
    }
}

/// A job taken off the queue.
///
/// The id stays reserved until this value is dropped, so hold it for the
/// whole processing pass.
#[derive(Debug)]
pub struct ClaimedJob {
    /// The job ID
    pub id: Uuid,
    in_flight: InFlight,
}

impl Drop for ClaimedJob {
    fn drop(&mut self) {
        self.in_flight.remove(&self.id);
    }
}

impl std::fmt::Debug for InFlight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight").field("len", &self.len()).finish()
    }
}
