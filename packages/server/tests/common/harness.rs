//! In-process test harness.
//!
//! Each test gets its own in-memory store, mock fetcher, job worker and
//! router. Requests go straight into the router with `oneshot`, so no port
//! is bound.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use extraction::MockFetcher;
use serde_json::Value;
use server_core::domains::scrape_jobs::{ScrapeJob, ScrapeJobService};
use server_core::kernel::jobs::WorkerHandle;
use server_core::kernel::{MemoryStore, TestDependencies};
use server_core::server::{build_app, start_job_system, AxumAppState, JobSystemOptions};
use test_context::AsyncTestContext;
use tower::ServiceExt;
use uuid::Uuid;

use super::{PAGE1_HTML, PAGE1_URL, PAGE2_HTML, PAGE2_URL};

/// Test harness wiring the full app over test doubles.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let (status, body) = ctx.get("/health").await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Backing store - inspect records directly from tests
    pub store: Arc<MemoryStore>,
    /// Shared with the app; add pages or check calls from tests
    pub fetcher: MockFetcher,
    pub service: ScrapeJobService,
    app: Router,
    worker: WorkerHandle,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self::new()
    }

    async fn teardown(self) {
        let _ = self.worker.shutdown().await;
    }
}

impl TestHarness {
    /// Harness serving the two example pages.
    pub fn new() -> Self {
        Self::with_deps(
            TestDependencies::new()
                .with_page(PAGE1_URL, PAGE1_HTML)
                .with_page(PAGE2_URL, PAGE2_HTML),
        )
    }

    /// Harness over custom test dependencies.
    pub fn with_deps(deps: TestDependencies) -> Self {
        let store = deps.store.clone();
        let fetcher = deps.fetcher.clone();
        let deps = deps.into_deps();

        let jobs = start_job_system(
            &deps,
            JobSystemOptions {
                queue_capacity: 64,
                ..Default::default()
            },
        );

        let app = build_app(AxumAppState {
            service: jobs.service.clone(),
            store: deps.store.clone(),
        });

        Self {
            store,
            fetcher,
            service: jobs.service,
            app,
            worker: jobs.worker,
        }
    }

    /// Send one request through the router and decode the JSON body.
    ///
    /// Empty bodies decode to `Value::Null`.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).expect("valid request")).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a job over HTTP and return its id.
    pub async fn create_job(&self, body: Value) -> Uuid {
        let (status, json) = self.post("/api/jobs", body).await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {json}");
        json["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .expect("id in create response")
    }

    /// Poll until job `id` is terminal.
    pub async fn wait_for_terminal(&self, id: Uuid) -> ScrapeJob {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let job = self
                .service
                .get_job_by_id(id)
                .await
                .expect("store read")
                .expect("job exists");
            if job.is_terminal() {
                return job;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "job {id} still pending"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
