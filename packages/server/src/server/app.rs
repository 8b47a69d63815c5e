//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::scrape_jobs::{ScrapeJobService, ScrapeJobSettings};
use crate::kernel::jobs::{channel, JobWorker, JobWorkerConfig, WorkerHandle};
use crate::kernel::{BaseKeyValueStore, ServerDeps};
use crate::server::routes::{
    create_job_handler, delete_job_handler, get_job_handler, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub service: ScrapeJobService,
    pub store: Arc<dyn BaseKeyValueStore>,
}

/// Job processing wiring: service, queue and the worker draining it.
pub struct JobSystem {
    pub service: ScrapeJobService,
    pub worker: WorkerHandle,
}

/// Options for [`start_job_system`].
#[derive(Debug, Clone)]
pub struct JobSystemOptions {
    pub settings: ScrapeJobSettings,
    pub worker: JobWorkerConfig,
    pub queue_capacity: usize,
}

impl Default for JobSystemOptions {
    fn default() -> Self {
        Self {
            settings: ScrapeJobSettings::default(),
            worker: JobWorkerConfig::default(),
            queue_capacity: 1024,
        }
    }
}

impl From<&Config> for JobSystemOptions {
    fn from(config: &Config) -> Self {
        Self {
            settings: ScrapeJobSettings::from(config),
            worker: JobWorkerConfig {
                max_concurrent_jobs: config.worker_concurrency,
                shutdown_timeout: config.worker_shutdown_timeout(),
                ..Default::default()
            },
            queue_capacity: config.queue_capacity,
        }
    }
}

/// Create the dispatch queue and spawn the worker pool that drains it.
///
/// Must be called inside a tokio runtime.
pub fn start_job_system(deps: &ServerDeps, options: JobSystemOptions) -> JobSystem {
    let (queue, receiver) = channel(options.queue_capacity.max(1));
    let service = ScrapeJobService::new(deps, Arc::new(queue), options.settings);

    let worker =
        JobWorker::with_config(receiver, Arc::new(service.clone()), options.worker).spawn();

    JobSystem { service, worker }
}

/// Build the Axum application router
pub fn build_app(state: AxumAppState) -> Router {
    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/jobs", post(create_job_handler))
        .route(
            "/api/jobs/:id",
            get(get_job_handler).delete(delete_job_handler),
        )
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
