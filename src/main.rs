use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use study_locker_api::auth::AdminAuthority;
use study_locker_api::config::{self, StoreBackend};
use study_locker_api::store::{DocumentStore, MemoryStore, PgStore};
use study_locker_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, ADMIN_PASSWORD, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!("Starting Study Locker API in {:?} mode", config.environment);

    let store: Arc<dyn DocumentStore> = match config.database.backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config.database)
                .await
                .context("failed to connect to postgres")?;
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let admin = AdminAuthority::from_config(&config.security);
    if !admin.admin_configured() {
        tracing::warn!("ADMIN_PASSWORD is not set; resource mutations will be rejected");
    }
    if config.security.session_secret.is_none() {
        tracing::warn!("SESSION_SECRET is not set; /auth/login is disabled");
    }

    let router = app(AppState::new(store, admin), config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Study Locker API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
