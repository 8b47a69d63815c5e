use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use extraction::ScrapeResult;

/// ScrapeJob - a batch of (URL, selector) tasks and its aggregate outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeJob {
    pub id: Uuid,
    pub tasks: Vec<ScrapeTask>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,

    // Filled in by the single processing pass
    #[serde(default)]
    pub scraped_data: Vec<ScrapedData>,
    #[serde(default)]
    pub errors: Vec<TaskError>,
}

/// Job status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One extraction request: a page and the element to read from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeTask {
    pub url: String,
    pub selectors: TaskSelectors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSelectors {
    pub selector: String,
}

impl ScrapeTask {
    pub fn new(url: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            selectors: TaskSelectors {
                selector: selector.into(),
            },
        }
    }

    pub fn selector(&self) -> &str {
        &self.selectors.selector
    }
}

/// Text extracted for a successful task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedData {
    pub url: String,
    pub data: String,
}

/// Failure message for an unsuccessful task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    pub url: String,
    pub error: String,
}

impl ScrapeJob {
    /// Build a fresh pending job with a new id.
    pub fn new(tasks: Vec<ScrapeTask>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tasks,
            status: JobStatus::Pending,
            created_at: Utc::now(),
            scraped_data: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record one outcome per task, in task order, and settle the status.
    ///
    /// `outcomes` must line up with `self.tasks`. Any failure makes the job
    /// `failed`; otherwise it is `completed`.
    pub fn complete_with(&mut self, outcomes: Vec<ScrapeResult<String>>) {
        let mut scraped_data = Vec::with_capacity(outcomes.len());
        let mut errors = Vec::new();

        for (task, outcome) in self.tasks.iter().zip(outcomes) {
            match outcome {
                Ok(data) => scraped_data.push(ScrapedData {
                    url: task.url.clone(),
                    data,
                }),
                Err(e) => errors.push(TaskError {
                    url: task.url.clone(),
                    error: e.to_string(),
                }),
            }
        }

        self.status = if errors.is_empty() {
            JobStatus::Completed
        } else {
            JobStatus::Failed
        };
        self.scraped_data = scraped_data;
        self.errors = errors;
    }
}
