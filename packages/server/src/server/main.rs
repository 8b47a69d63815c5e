// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use extraction::{CssMatcher, FetchConfig, HttpFetcher};
use server_core::kernel::{RedisStore, ServerDeps};
use server_core::server::{build_app, start_job_system, AxumAppState, JobSystemOptions};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,extraction=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting scrape jobs API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to Redis
    tracing::info!("Connecting to Redis...");
    let store = Arc::new(RedisStore::connect(&config.redis_url).await?);

    let fetcher = HttpFetcher::new(
        FetchConfig::default()
            .with_timeout(config.fetch_timeout())
            .with_user_agent(config.fetch_user_agent.clone())
            .with_max_body_bytes(config.fetch_max_body_bytes),
    )
    .context("Failed to build HTTP fetcher")?;

    let deps = ServerDeps::new(store.clone(), Arc::new(fetcher), Arc::new(CssMatcher::new()));

    // Start background processing
    let jobs = start_job_system(&deps, JobSystemOptions::from(&config));

    let app = build_app(AxumAppState {
        service: jobs.service.clone(),
        store,
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("HTTP server stopped, draining job worker");
    jobs.worker.shutdown().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
