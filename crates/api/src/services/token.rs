//! Session token service.
//!
//! Issues and verifies signed, time-limited bearer tokens carrying an
//! identity and a role claim. HS256 with a process-wide secret; a pure
//! function of secret + clock, no storage involved. There is no refresh
//! mechanism: once a token expires the caller must log in again.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clinic_core::Role;

/// Default token lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 10;

/// Errors from token verification or issuance.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature check failed, structure malformed, or expiry passed.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The role claim does not match what the guard requires.
    #[error("token role '{actual}' does not satisfy required role '{expected}'")]
    RoleMismatch {
        /// Role the calling guard requires.
        expected: Role,
        /// Role found in the token.
        actual: Role,
    },

    /// Token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the principal's username.
    pub sub: String,
    /// Role claim constraining which guards accept this token.
    pub role: Role,
    /// Absolute expiry as a unix timestamp.
    pub exp: i64,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service from the signing secret and lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_minutes: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: an expired token is rejected immediately.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issue a token for `subject` with the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, role, self.ttl)
    }

    /// Issue a token with an explicit lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails.
    pub fn issue_with_ttl(
        &self,
        subject: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_owned(),
            role,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token's signature, structure, and expiry.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidToken` on any verification failure.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::InvalidToken)
    }

    /// Verify a token and additionally require a specific role claim.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidToken` on verification failure, or
    /// `TokenError::RoleMismatch` when the role claim differs from `required`.
    pub fn verify_role(&self, token: &str, required: Role) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;

        if claims.role != required {
            return Err(TokenError::RoleMismatch {
                expected: required,
                actual: claims.role,
            });
        }

        Ok(claims)
    }
}
