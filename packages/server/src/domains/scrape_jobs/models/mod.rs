pub mod job_store;
pub mod scrape_job;

pub use job_store::{job_key, JobStore};
pub use scrape_job::{JobStatus, ScrapeJob, ScrapeTask, ScrapedData, TaskError, TaskSelectors};
