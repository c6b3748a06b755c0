//! Authentication extractors for route handlers.
//!
//! Each guard verifies the bearer token's signature, expiry, and role
//! claim, then re-checks the principal against the store. A token whose
//! account has since been deleted is rejected even if the token itself
//! is still valid.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use clinic_core::Role;

use crate::db::doctors::DoctorRepository;
use crate::db::users::FrontDeskRepository;
use crate::error::ApiError;
use crate::models::{DoctorLogin, FrontDeskUser};
use crate::state::AppState;

/// Extractor that requires a valid front-desk session token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireFrontDesk(user): RequireFrontDesk,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireFrontDesk(pub FrontDeskUser);

impl<S> FromRequestParts<S> for RequireFrontDesk
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = bearer_token(parts)?;
        let claims = state.tokens().verify_role(token, Role::FrontDesk)?;

        let user = FrontDeskRepository::new(state.pool())
            .get_by_username(&claims.sub)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::Unauthorized("could not validate credentials".to_string()))?;

        Ok(Self(user))
    }
}

/// Extractor that requires a valid doctor session token.
pub struct RequireDoctor(pub DoctorLogin);

impl<S> FromRequestParts<S> for RequireDoctor
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = bearer_token(parts)?;
        let claims = state.tokens().verify_role(token, Role::Doctor)?;

        let login = DoctorRepository::new(state.pool())
            .get_login_by_username(&claims.sub)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::Unauthorized("could not validate credentials".to_string()))?;

        Ok(Self(login))
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))
}
