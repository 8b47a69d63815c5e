use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub port: u16,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_max_body_bytes: usize,
    pub worker_concurrency: usize,
    pub task_concurrency: usize,
    pub queue_capacity: usize,
    /// Records expire after this many seconds when set
    pub job_ttl_secs: Option<u64>,
    pub worker_shutdown_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let config = Self {
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            port: parse_var("PORT", 8080)?,
            fetch_timeout_secs: parse_var("FETCH_TIMEOUT_SECS", 30)?,
            fetch_user_agent: env::var("FETCH_USER_AGENT")
                .unwrap_or_else(|_| "ScrapeJobsBot/1.0".to_string()),
            fetch_max_body_bytes: parse_var("FETCH_MAX_BODY_BYTES", 10 * 1024 * 1024)?,
            worker_concurrency: parse_var("WORKER_CONCURRENCY", 4)?,
            task_concurrency: parse_var("TASK_CONCURRENCY", 8)?,
            queue_capacity: parse_var("QUEUE_CAPACITY", 1024)?,
            job_ttl_secs: parse_optional_var("JOB_TTL_SECS")?,
            worker_shutdown_timeout_secs: parse_var("WORKER_SHUTDOWN_TIMEOUT_SECS", 30)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch_max_body_bytes == 0 {
            bail!("FETCH_MAX_BODY_BYTES must be at least 1");
        }
        if self.worker_concurrency == 0 {
            bail!("WORKER_CONCURRENCY must be at least 1");
        }
        if self.task_concurrency == 0 {
            bail!("TASK_CONCURRENCY must be at least 1");
        }
        if self.queue_capacity == 0 {
            bail!("QUEUE_CAPACITY must be at least 1");
        }
        if self.job_ttl_secs == Some(0) {
            bail!("JOB_TTL_SECS must be positive when set");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn job_ttl(&self) -> Option<Duration> {
        self.job_ttl_secs.map(Duration::from_secs)
    }

    pub fn worker_shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_shutdown_timeout_secs)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a valid number")),
        Err(_) => Ok(default),
    }
}

fn parse_optional_var<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a valid number")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            redis_url: "redis://localhost:6379".to_string(),
            port: 8080,
            fetch_timeout_secs: 30,
            fetch_user_agent: "test".to_string(),
            fetch_max_body_bytes: 1024,
            worker_concurrency: 4,
            task_concurrency: 8,
            queue_capacity: 16,
            job_ttl_secs: None,
            worker_shutdown_timeout_secs: 30,
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut c = config();
        c.worker_concurrency = 0;
        assert!(c.validate().is_err());

        let mut c = config();
        c.task_concurrency = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut c = config();
        c.job_ttl_secs = Some(0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_durations() {
        let mut c = config();
        c.job_ttl_secs = Some(60);
        assert_eq!(c.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(c.job_ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        let value: u16 = parse_var("SCRAPE_JOBS_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
        let value: Option<u64> = parse_optional_var("SCRAPE_JOBS_TEST_UNSET_VAR").unwrap();
        assert_eq!(value, None);
    }
}
