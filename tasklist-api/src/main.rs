//! # Tasklist API Server
//!
//! REST backend for users and their tasks, with JWT bearer authentication.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p tasklist-api
//! ```
//!
//! Set `DATABASE_URL` (or `STORAGE_BACKEND=postgres`) to persist to
//! PostgreSQL; otherwise data lives in memory. `LOG_FORMAT=json` switches to
//! JSON logs.

use anyhow::Context;
use tasklist_api::{
    app::{build_router, AppState},
    config::{Config, StorageBackend},
};
use tasklist_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::Store,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the log filter is read
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "Tasklist API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    let (store, pool) = match config.storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data will be lost on restart");
            (Store::memory(), None)
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .clone()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = create_pool(DatabaseConfig {
                url,
                max_connections: config.storage.max_connections,
                ..Default::default()
            })
            .await
            .context("Failed to connect to the database")?;

            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;

            (Store::postgres(pool.clone()), Some(pool))
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(store, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Installs the global subscriber; `LOG_FORMAT=json` selects JSON output
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "tasklist_api=debug,tasklist_shared=debug,tower_http=debug".into()
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
