//! Scrape jobs domain - batches of (URL, selector) extraction tasks

pub mod data;
pub mod models;
pub mod service;

pub use data::{CreateJobRequest, CreateJobResponse, ValidationErrors};
pub use models::{JobStatus, JobStore, ScrapeJob, ScrapeTask, ScrapedData, TaskError};
pub use service::{ProcessOutcome, ScrapeJobService, ScrapeJobSettings};
