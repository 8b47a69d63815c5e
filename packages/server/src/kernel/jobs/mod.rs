//! Job infrastructure for background processing.
//!
//! This module provides the kernel-level infrastructure for job execution:
//! - [`ChannelJobQueue`] - In-process dispatch queue (bounded mpsc channel)
//! - [`JobWorker`] - Long-running service that drains the queue
//! - [`JobHandler`] - What the worker calls for each job id
//!
//! # Architecture
//!
//! ```text
//! Surface calls service.create_job(tasks)
//!     │
//!     └─► ChannelJobQueue.enqueue(id)
//!             └─► refused if id is already queued/running
//!
//! JobWorker
//!     │
//!     ├─► JobReceiver.recv()
//!     ├─► JobHandler.handle(id)
//!     └─► release id
//! ```
//!
//! Job semantics live in `domains::scrape_jobs`; this module only schedules.

mod queue;
mod worker;

pub use queue::{
    channel, ChannelJobQueue, ClaimedJob, EnqueueError, EnqueueResult, JobQueue, JobReceiver,
};
pub use worker::{JobHandler, JobWorker, JobWorkerConfig, WorkerHandle};
