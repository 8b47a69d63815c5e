pub mod create_job;

pub use create_job::{CreateJobRequest, CreateJobResponse, ValidationErrors};
