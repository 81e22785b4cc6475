//! Storage error type shared by everything that touches the pool.

use thiserror::Error;

/// Errors surfaced by the database layer.
///
/// Callers receive these unchanged; the HTTP boundary decides how much of
/// the cause is safe to expose.
#[derive(Debug, Error)]
pub enum DbError {
    /// Opening the pool or an individual connection failed.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Startup DDL could not be applied.
    #[error("failed to apply database schema: {0}")]
    Schema(#[source] sqlx::Error),

    /// A query failed after the pool was established.
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}
