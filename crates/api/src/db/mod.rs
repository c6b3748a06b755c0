//! Database operations for the clinic store (SQLite).
//!
//! ## Tables
//!
//! - `frontdesk_users` - Front-desk staff accounts
//! - `doctors` / `doctor_logins` - Doctor profiles paired 1:1 with portal logins
//! - `appointments` - Booked appointments
//! - `queue` - Walk-in queue with monotonic sequence numbers
//!
//! Repositories use the runtime `sqlx` query API and map raw rows into the
//! domain types in [`crate::models`]. Multi-step writes (doctor + login, or
//! appointment + queue item) always run inside a single transaction.

pub mod appointments;
pub mod doctors;
pub mod queue;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

/// Embedded schema migrations, run once at startup.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,

    /// A stored value could not be mapped back into a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing; use `sqlite::memory:` for an
/// ephemeral store.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        // Declarative-only foreign keys (see migrations/0001_init.sql):
        // sqlx turns the pragma on by default, so switch it off explicitly.
        .foreign_keys(false);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Map an insert error to `Conflict` when it is a unique violation.
pub(crate) fn map_unique_violation(e: sqlx::Error, conflict_msg: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(conflict_msg.to_owned());
    }
    RepositoryError::Database(e)
}
