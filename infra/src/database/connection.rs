//! Database connection pool management.
//!
//! Wraps the SQLx MySQL pool with the settings from `DatabaseConfig` and
//! exposes health checking and embedded schema migrations.

use std::time::Duration;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};

use hg_core::errors::{DomainError, DomainResult};
use hg_shared::config::DatabaseConfig;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Create a new connection pool from the configuration.
    ///
    /// Connections are tested before being handed out, so a dead server
    /// surfaces as an acquire error rather than a failed query.
    pub async fn new(config: &DatabaseConfig) -> DomainResult<Self> {
        tracing::info!(
            max_connections = config.max_connections,
            "Creating database connection pool"
        );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect(&config.url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                DomainError::Internal {
                    message: format!("Failed to create database pool: {}", e),
                }
            })?;

        tracing::info!("Database connection pool created");
        Ok(Self { pool })
    }

    /// The underlying SQLx pool, for constructing repositories
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Verify connectivity with a round trip
    pub async fn health_check(&self) -> DomainResult<bool> {
        let row = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Database health check failed: {}", e),
            })?;

        let value: i32 = row.try_get(0).unwrap_or(0);
        Ok(value == 1)
    }

    /// Apply the embedded schema migrations
    pub async fn run_migrations(&self) -> DomainResult<()> {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Migration failed: {}", e),
            })?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Close all pool connections, for shutdown
    pub async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }
}
