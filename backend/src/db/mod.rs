//! Database pool, migrations and the readiness query

use crate::config::DatabaseConfig;
use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Connect a pool sized by the `database` config section
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)?.application_name("vitality");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(connect_options)
        .await?;

    info!(
        max = config.max_connections,
        min = config.min_connections,
        "Database pool created"
    );
    Ok(pool)
}

/// Apply the analytics schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// `SELECT 1` against the pool, used by `PgStore::ping`
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ()).map_err(|e| {
        warn!("Database health check failed: {}", e);
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[tokio::test]
    #[cfg_attr(not(feature = "integration"), ignore = "requires database")]
    async fn test_migrated_pool_answers_health_check() {
        let mut config = AppConfig::default().database;
        if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
            config.url = url;
        }
        config.min_connections = 0;
        config.max_connections = 2;

        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        assert!(health_check(&pool).await.is_ok());
    }
}
