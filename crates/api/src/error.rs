//! Unified error handling for the HTTP surface.
//!
//! Every error response carries a JSON body of the shape
//! `{"detail": "<message>"}`. Internal failures are logged with their
//! full cause but reported to clients with a generic message.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::provisioning::ProvisionError;
use crate::services::queue::QueueError;
use crate::services::token::TokenError;

/// Application-level error type for the clinic API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request is not authenticated or the token is unusable.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// State conflict (duplicate username, email, or queue number).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request failed");
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let detail = match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Conflict(msg)
            | Self::BadRequest(msg) => msg,
        };

        let mut response = (status, Json(json!({ "detail": detail }))).into_response();

        // Advertise the expected auth scheme on challenges
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound("resource not found".to_string()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Self::Unauthorized("invalid credentials".to_string()),
            AuthError::UsernameTaken => Self::Conflict("username already registered".to_string()),
            AuthError::DoctorProfileMissing => {
                Self::Unauthorized("invalid credentials".to_string())
            }
            AuthError::Repository(repo) => repo.into(),
            other @ (AuthError::PasswordHash | AuthError::Token(_)) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidToken | TokenError::RoleMismatch { .. } => {
                Self::Unauthorized("could not validate credentials".to_string())
            }
            TokenError::Signing(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(e: ProvisionError) -> Self {
        match e {
            ProvisionError::Conflict(msg) => Self::Conflict(msg),
            ProvisionError::Notification(err) => {
                Self::Internal(format!("credential delivery failed: {err}"))
            }
            ProvisionError::Storage(repo) => repo.into(),
            other @ (ProvisionError::UsernameSpaceExhausted | ProvisionError::PasswordHash) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<QueueError> for ApiError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::NotFound => Self::NotFound("patient not found in queue".to_string()),
            QueueError::Empty => Self::NotFound("queue is already empty".to_string()),
            QueueError::Repository(repo) => repo.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(ApiError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::Unauthorized("x".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(ApiError::Conflict("x".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ApiError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_advertises_bearer_scheme() {
        let response = ApiError::Unauthorized("missing bearer token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }

    #[test]
    fn test_non_challenge_responses_carry_no_auth_header() {
        let response = ApiError::NotFound("doctor not found".to_string()).into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_internal_details_hidden() {
        let response = ApiError::Internal("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_queue_empty_maps_to_not_found() {
        assert_eq!(get_status(QueueError::Empty.into()), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_auth_errors() {
        assert_eq!(
            get_status(AuthError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AuthError::UsernameTaken.into()),
            StatusCode::CONFLICT
        );
    }
}
