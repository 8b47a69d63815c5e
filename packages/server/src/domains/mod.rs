// Business domains
pub mod scrape_jobs;
