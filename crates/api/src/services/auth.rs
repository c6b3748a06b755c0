//! Authentication service.
//!
//! Front-desk registration and the two login flows. Passwords are stored
//! as Argon2 hashes; successful logins are exchanged for role-scoped
//! session tokens. Failed logins return `InvalidCredentials` uniformly,
//! whether the username was unknown or the password wrong.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use thiserror::Error;

use clinic_core::Role;

use crate::db::RepositoryError;
use crate::db::doctors::DoctorRepository;
use crate::db::users::FrontDeskRepository;
use crate::models::{Doctor, DoctorLogin, FrontDeskUser};

use super::token::TokenService;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password or unknown username. One variant for both so the
    /// response does not reveal which usernames exist.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username is already registered.
    #[error("username already registered")]
    UsernameTaken,

    /// A login record exists but its doctor profile row is gone.
    #[error("doctor profile missing for login")]
    DoctorProfileMissing,

    /// Failed to hash a password.
    #[error("failed to hash password")]
    PasswordHash,

    /// Failed to issue a session token.
    #[error("token issuance failed: {0}")]
    Token(#[from] super::token::TokenError),

    /// Underlying repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A successful doctor login: the login record, the profile it belongs
/// to, and a fresh session token.
pub struct DoctorSession {
    pub login: DoctorLogin,
    pub doctor: Doctor,
    pub token: String,
}

/// Authentication service.
///
/// Handles front-desk registration and both login flows.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, tokens: &'a TokenService) -> Self {
        Self { pool, tokens }
    }

    /// Register a front-desk user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UsernameTaken` if the username is registered.
    pub async fn register_frontdesk(
        &self,
        username: &str,
        password: &str,
    ) -> Result<FrontDeskUser, AuthError> {
        let password_hash = hash_password(password)?;

        let user = FrontDeskRepository::new(self.pool)
            .create(username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(username = %user.username, "Front-desk user registered");
        Ok(user)
    }

    /// Login as a front-desk user, returning a front-desk session token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on failure.
    pub async fn login_frontdesk(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(FrontDeskUser, String), AuthError> {
        let (user, password_hash) = FrontDeskRepository::new(self.pool)
            .get_with_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.tokens.issue(&user.username, Role::FrontDesk)?;

        Ok((user, token))
    }

    /// Login as a doctor via a portal login record, returning a doctor
    /// session token along with the doctor's profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on failure.
    pub async fn login_doctor(
        &self,
        username: &str,
        password: &str,
    ) -> Result<DoctorSession, AuthError> {
        let doctors = DoctorRepository::new(self.pool);

        let (login, password_hash) = doctors
            .get_login_with_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let doctor = doctors
            .get(login.doctor_id)
            .await?
            .ok_or(AuthError::DoctorProfileMissing)?;

        let token = self.tokens.issue(&login.username, Role::Doctor)?;

        Ok(DoctorSession {
            login,
            doctor,
            token,
        })
    }

    /// Create the bootstrap front-desk user if it does not already exist.
    ///
    /// Idempotent across restarts; returns `true` when a user was created.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the lookup or insert fails.
    pub async fn seed_frontdesk_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, AuthError> {
        let users = FrontDeskRepository::new(self.pool);

        if users.get_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = hash_password(password)?;
        users.create(username, &password_hash).await?;

        tracing::info!(username = %username, "Bootstrap front-desk user created");
        Ok(true)
    }
}

/// Hash a password for storage.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the hash is unparseable or
/// the password does not match.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
