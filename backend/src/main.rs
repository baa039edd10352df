//! Vitality Backend
//!
//! Health and study analytics with rule-based insights.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! - Routes: HTTP request handling and routing
//! - Services: Aggregation, goal tracking, streaks and insights
//! - Repositories: Store traits with PostgreSQL and in-memory backends
//! - Database: PostgreSQL with SQLx

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitality_backend::{
    config::{self, StorageBackend},
    db,
    repositories::{InMemoryStore, PgStore, Store},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        storage = ?config.storage.backend,
        "Starting Vitality Backend"
    );

    // Validate production configuration
    if config::AppConfig::is_production() {
        validate_production_config(&config)?;
    }

    let store = create_store(&config).await?;

    // Create application state
    let mut state = AppState::new(store, config.clone());
    if config.metrics.enabled {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus recorder installed");
        state = state.with_metrics(handle);
    }

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Build the configured store
async fn create_store(config: &config::AppConfig) -> Result<Arc<dyn Store>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using the in-memory store; data is lost on shutdown");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = db::create_pool(&config.database).await?;

            // Run migrations (skip in production if using separate migration job)
            if !config::AppConfig::is_production() {
                info!("Running database migrations...");
                db::run_migrations(&pool).await?;
            }

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "vitality_backend=info,tower_http=info".into()
        } else {
            "vitality_backend=debug,tower_http=debug,sqlx=warn".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Validate configuration for production deployment
fn validate_production_config(config: &config::AppConfig) -> Result<()> {
    let mut errors = Vec::new();

    if config.storage.backend == StorageBackend::Memory {
        errors.push("The in-memory store cannot be used in production");
    }

    // Check database URL is not localhost in production
    if config.database.url.contains("localhost") || config.database.url.contains("127.0.0.1") {
        warn!("Database URL contains localhost - ensure this is intentional for production");
    }

    if !errors.is_empty() {
        for err in &errors {
            error!("Configuration error: {}", err);
        }
        anyhow::bail!("Invalid production configuration");
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install signal handler: {}", e);
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
