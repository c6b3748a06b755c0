//! Appointment handlers (front-desk only).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use clinic_core::{AppointmentId, DoctorId};

use crate::db::appointments::{AppointmentRepository, AppointmentUpdate};
use crate::error::ApiError;
use crate::middleware::RequireFrontDesk;
use crate::models::{Appointment, AppointmentWithDoctor};
use crate::state::AppState;

/// Booking request. Status is not accepted: every appointment starts as
/// `booked`.
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_name: String,
    pub doctor_id: DoctorId,
    pub appointment_time: String,
}

/// List all appointments with their doctor's name.
///
/// GET /appointments
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_appointments(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
) -> Result<Json<Vec<AppointmentWithDoctor>>, ApiError> {
    let appointments = AppointmentRepository::new(state.pool())
        .list_with_doctor()
        .await?;

    Ok(Json(appointments))
}

/// Get an appointment by ID.
///
/// GET /appointments/{id}
///
/// # Errors
///
/// Returns 404 if the appointment does not exist.
pub async fn get_appointment(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Path(id): Path<AppointmentId>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = AppointmentRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("appointment not found".to_string()))?;

    Ok(Json(appointment))
}

/// Book an appointment.
///
/// POST /appointments
///
/// The referenced doctor is not validated; a stale `doctor_id` produces a
/// dangling appointment that lists with an empty doctor name.
///
/// # Errors
///
/// Returns 500 if the insert fails.
pub async fn create_appointment(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let appointment = AppointmentRepository::new(state.pool())
        .create(&req.patient_name, req.doctor_id, &req.appointment_time)
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Apply a partial update to an appointment.
///
/// PUT /appointments/{id}
///
/// # Errors
///
/// Returns 404 if the appointment does not exist.
pub async fn update_appointment(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Path(id): Path<AppointmentId>,
    Json(changes): Json<AppointmentUpdate>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = AppointmentRepository::new(state.pool())
        .update(id, &changes)
        .await?;

    Ok(Json(appointment))
}

/// Delete an appointment.
///
/// DELETE /appointments/{id}
///
/// # Errors
///
/// Returns 404 if the appointment does not exist.
pub async fn delete_appointment(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Path(id): Path<AppointmentId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    AppointmentRepository::new(state.pool()).delete(id).await?;

    Ok(Json(serde_json::json!({ "msg": "Appointment deleted" })))
}
