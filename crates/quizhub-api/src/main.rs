//! quizhub API server entry point.

use std::sync::{Arc, Mutex};

use quizhub_api::config::ServerConfig;
use quizhub_api::error::AppError;
use quizhub_api::state::AppState;
use quizhub_api::telemetry;
use quizhub_core::clock::SystemClock;
use quizhub_core::repository::SessionRepository;
use quizhub_core::rng::SystemRng;
use quizhub_inference::OllamaBackend;
use quizhub_store::memory::InMemorySessionRepository;
use quizhub_store::pg::PgSessionRepository;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = ServerConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!("Starting quizhub API server");

    // Pick the session store.
    let session_repository: Arc<dyn SessionRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await?;
            let repo = PgSessionRepository::new(pool);
            repo.migrate().await?;
            Arc::new(repo)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; sessions are kept in memory");
            Arc::new(InMemorySessionRepository::new())
        }
    };

    tracing::info!(
        url = %config.inference.base_url,
        model = %config.inference.model,
        "using inference service"
    );

    // Build application state.
    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(Mutex::new(SystemRng::from_os())),
        session_repository,
        Arc::new(OllamaBackend::new(config.inference.clone())),
    );
    let app = quizhub_api::app(app_state);

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tracing::info!("Server stopped");
    telemetry.shutdown();

    Ok(())
}
