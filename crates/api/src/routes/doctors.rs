//! Doctor registry handlers (front-desk only).

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use clinic_core::DoctorId;

use crate::db::doctors::{DoctorRepository, DoctorUpdate};
use crate::error::ApiError;
use crate::middleware::RequireFrontDesk;
use crate::models::{Doctor, DoctorProfile};
use crate::services::provisioning::ProvisioningService;
use crate::state::AppState;

/// Query filter for doctor listings.
#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    /// Case-insensitive substring match on specialization.
    pub specialization: Option<String>,
}

/// One-time credential pair included in the provisioning response.
#[derive(Debug, Serialize)]
pub struct IssuedCredentials {
    pub username: String,
    pub password: String,
}

/// Response for a successful doctor provisioning.
#[derive(Debug, Serialize)]
pub struct CreateDoctorResponse {
    pub msg: String,
    pub doctor: Doctor,
    pub login: IssuedCredentials,
}

/// List doctors, optionally filtered by specialization.
///
/// GET /doctors
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_doctors(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Vec<Doctor>>, ApiError> {
    let doctors = DoctorRepository::new(state.pool())
        .list(query.specialization.as_deref())
        .await?;

    Ok(Json(doctors))
}

/// Get a doctor by ID.
///
/// GET /doctors/{id}
///
/// # Errors
///
/// Returns 404 if the doctor does not exist.
pub async fn get_doctor(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Path(id): Path<DoctorId>,
) -> Result<Json<Doctor>, ApiError> {
    let doctor = DoctorRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("doctor not found".to_string()))?;

    Ok(Json(doctor))
}

/// Provision a new doctor: profile, portal login, and credential email.
///
/// POST /doctors
///
/// # Errors
///
/// Returns 409 if the email is already registered, and 500 if credential
/// delivery fails (nothing is stored in that case).
pub async fn create_doctor(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Json(profile): Json<DoctorProfile>,
) -> Result<(StatusCode, Json<CreateDoctorResponse>), ApiError> {
    let provisioning = ProvisioningService::new(state.pool(), state.notifier());
    let provisioned = provisioning.provision_doctor(&profile).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateDoctorResponse {
            msg: "Doctor created and credentials emailed".to_string(),
            doctor: provisioned.doctor,
            login: IssuedCredentials {
                username: provisioned.username,
                password: provisioned.password,
            },
        }),
    ))
}

/// Apply a partial update to a doctor's profile.
///
/// PUT /doctors/{id}
///
/// # Errors
///
/// Returns 404 if the doctor does not exist and 409 on an email conflict.
pub async fn update_doctor(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Path(id): Path<DoctorId>,
    Json(changes): Json<DoctorUpdate>,
) -> Result<Json<Doctor>, ApiError> {
    let doctor = DoctorRepository::new(state.pool())
        .update(id, &changes)
        .await?;

    Ok(Json(doctor))
}

/// Delete a doctor and its portal login.
///
/// DELETE /doctors/{id}
///
/// Appointments referencing the doctor are left in place and render with
/// an empty doctor name.
///
/// # Errors
///
/// Returns 404 if the doctor does not exist.
pub async fn delete_doctor(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Path(id): Path<DoctorId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    DoctorRepository::new(state.pool())
        .delete_with_login(id)
        .await?;

    Ok(Json(serde_json::json!({ "msg": "Doctor deleted" })))
}
