//! Connection pool creation and lifecycle.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::DbError;

/// Connection parameters for the database pool.
#[derive(Debug, Clone)]
pub struct DbConfig {
    url: String,
    max_connections: u32,
}

impl DbConfig {
    /// Create a config for the given connection URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
        }
    }

    /// Cap the number of pooled connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// The connection URL this config points at.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Process-wide database handle wrapping a SQLite connection pool.
///
/// Cloning is cheap (the pool is internally shared); `close` tears the
/// pool down once serving has stopped.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a connection pool for the given config.
    ///
    /// File-backed databases are created when missing. In-memory databases
    /// are pinned to a single connection that is never reaped, because each
    /// new in-memory connection would start with its own empty schema.
    pub async fn connect(config: DbConfig) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(config.url())
            .map_err(DbError::Connect)?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(DbError::Connect)?;

        tracing::info!(url = %config.url(), "database pool connected");
        Ok(Self { pool })
    }

    /// The underlying pool, for injection into stores.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply idempotent schema DDL (`CREATE TABLE IF NOT EXISTS` and
    /// friends). Accepts multi-statement batches.
    pub async fn execute_ddl(&self, ddl: &str) -> Result<(), DbError> {
        sqlx::raw_sql(ddl)
            .execute(&self.pool)
            .await
            .map_err(DbError::Schema)?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to drain.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}
