mod config;
mod db;
mod error;
mod routes;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use config::Config;
use db::PgStore;
use pagewright_core::ExtractConfig;
use routes::AppState;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("Failed to read configuration")?;
    tracing::info!(database = %config.redacted_database_url(), pool_size = config.pool_size, "connecting");

    let store = PgStore::connect(&config.database_url, config.pool_size).context("Failed to create pool")?;
    store.migrate().await.context("Failed to apply schema")?;

    let mut app = routes::router(AppState::new(store, ExtractConfig::default()));
    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "serving static files");
        app = app.fallback_service(ServeDir::new(dir));
    }

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(config.request_timeout);
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CompressionLayer::new())
            .layer(timeout)
            .layer(DefaultBodyLimit::max(config.body_limit)),
    );

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "pagewright server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await.context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
