//! APIBoy Backend
//!
//! ## Architecture
//!
//! - Routes: RPC-style HTTP surface, one `POST` per operation
//! - Pipeline: validate → authenticate → business for every operation
//! - Services: business logic and authorization
//! - Repositories: typed documents with lifecycle events
//! - Store: JSON documents in memory or PostgreSQL

use anyhow::Result;
use apiboy_backend::config::{AppConfig, StoreBackend};
use apiboy_backend::store::{MemoryStore, PgDocumentStore, SharedStore};
use apiboy_backend::{db, routes, state::AppState};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if AppConfig::is_production() { "production" } else { "development" },
        store = ?config.store.backend,
        "Starting APIBoy backend"
    );

    if AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let store = connect_store(&config).await?;
    let state = AppState::new(store, config.clone());
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Build the configured document store backend
async fn connect_store(config: &AppConfig) -> Result<SharedStore> {
    match config.store.backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            info!("Connecting to database...");
            let pool = db::create_pool(&config.store.url, config.store.max_connections).await?;
            info!("Running database migrations...");
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "apiboy_backend=info,tower_http=info".into()
        } else {
            "apiboy_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for log aggregation
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

fn validate_production_config(config: &AppConfig) -> Result<()> {
    let errors = config.production_errors();

    if config.store.url.contains("localhost") || config.store.url.contains("127.0.0.1") {
        warn!("Store URL points at localhost, ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
