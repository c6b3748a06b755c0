//! Registration and login handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use clinic_core::DoctorId;

use crate::error::ApiError;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Credentials for registration and both login flows.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub msg: String,
    pub username: String,
}

/// Response for a successful front-desk login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Response for a successful doctor login, with the doctor's identity so
/// the portal can greet and scope by doctor.
#[derive(Debug, Serialize)]
pub struct DoctorTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub doctor_id: DoctorId,
    pub doctor_name: String,
}

/// Register a front-desk user.
///
/// POST /register
///
/// # Errors
///
/// Returns 409 if the username is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let user = auth.register_frontdesk(&req.username, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "User registered successfully".to_string(),
            username: user.username,
        }),
    ))
}

/// Login as a front-desk user.
///
/// POST /frontdesk/login
///
/// # Errors
///
/// Returns 401 on bad credentials; no token is issued in that case.
pub async fn frontdesk_login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let (_user, token) = auth.login_frontdesk(&req.username, &req.password).await?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

/// Login as a doctor through the portal.
///
/// POST /doctor/login
///
/// # Errors
///
/// Returns 401 on bad credentials; no token is issued in that case.
pub async fn doctor_login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<DoctorTokenResponse>, ApiError> {
    let auth = AuthService::new(state.pool(), state.tokens());
    let session = auth.login_doctor(&req.username, &req.password).await?;

    Ok(Json(DoctorTokenResponse {
        access_token: session.token,
        token_type: "bearer".to_string(),
        doctor_id: session.doctor.id,
        doctor_name: session.doctor.name,
    }))
}
