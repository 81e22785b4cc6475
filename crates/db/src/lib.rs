//! Database layer for Biblio.
//!
//! Owns the process-wide connection pool: acquired once at startup,
//! injected into whatever needs it, and released explicitly at shutdown.
//! Schema setup is limited to idempotent DDL; there is no migration
//! versioning.

mod error;
mod pool;

pub use error::DbError;
pub use pool::{Database, DbConfig};
