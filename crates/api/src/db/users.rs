//! Front-desk user repository.

use sqlx::SqlitePool;

use clinic_core::FrontDeskUserId;

use super::{RepositoryError, map_unique_violation};
use crate::models::FrontDeskUser;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
}

impl From<UserRow> for FrontDeskUser {
    fn from(r: UserRow) -> Self {
        Self {
            id: FrontDeskUserId::new(r.id),
            username: r.username,
        }
    }
}

/// Repository for front-desk staff accounts.
pub struct FrontDeskRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FrontDeskRepository<'a> {
    /// Create a new front-desk repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new front-desk user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<FrontDeskUser, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO frontdesk_users (username, password_hash)
            VALUES (?1, ?2)
            RETURNING id, username
            ",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username already registered"))?;

        Ok(row.into())
    }

    /// Get a user by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<FrontDeskUser>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username
            FROM frontdesk_users
            WHERE username = ?1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a user along with their password hash, for login verification.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(FrontDeskUser, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i64,
            username: String,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, Row>(
            r"
            SELECT id, username, password_hash
            FROM frontdesk_users
            WHERE username = ?1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            (
                FrontDeskUser {
                    id: FrontDeskUserId::new(r.id),
                    username: r.username,
                },
                r.password_hash,
            )
        }))
    }
}
