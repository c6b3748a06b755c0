//! Doctor portal handlers (doctor token required).
//!
//! The doctor's identity always comes from the authenticated login; there
//! is no way to read or modify another doctor's queue through these
//! endpoints.

use axum::{
    Json,
    extract::{Path, State},
};

use clinic_core::AppointmentId;

use crate::db::appointments::AppointmentRepository;
use crate::db::queue::QueueRepository;
use crate::error::ApiError;
use crate::middleware::RequireDoctor;
use crate::models::QueueItem;
use crate::state::AppState;

/// List the authenticated doctor's queue.
///
/// GET /doctor-queue
///
/// Queue items are matched through their `appointment_id` link to this
/// doctor's appointments.
///
/// # Errors
///
/// Returns 404 when the doctor's queue is empty.
pub async fn my_queue(
    State(state): State<AppState>,
    RequireDoctor(login): RequireDoctor,
) -> Result<Json<Vec<QueueItem>>, ApiError> {
    let items = QueueRepository::new(state.pool())
        .list_for_doctor(login.doctor_id)
        .await?;

    if items.is_empty() {
        return Err(ApiError::NotFound(
            "no patients in your queue".to_string(),
        ));
    }

    Ok(Json(items))
}

/// Remove one of the authenticated doctor's appointments, along with any
/// queue item linked to it.
///
/// DELETE /doctorremovepatient/{id}
///
/// The path parameter is the appointment ID, so the doctor removes
/// exactly the appointment they picked rather than whichever one happens
/// to share a patient name.
///
/// # Errors
///
/// Returns 404 if the appointment does not exist or belongs to another
/// doctor.
pub async fn remove_patient(
    State(state): State<AppState>,
    RequireDoctor(login): RequireDoctor,
    Path(id): Path<AppointmentId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let appointments = AppointmentRepository::new(state.pool());

    // Ownership check: other doctors' appointments look like they don't
    // exist.
    let appointment = appointments
        .get(id)
        .await?
        .filter(|a| a.doctor_id == login.doctor_id)
        .ok_or_else(|| ApiError::NotFound("appointment not found".to_string()))?;

    appointments.delete_with_queue_item(appointment.id).await?;

    Ok(Json(serde_json::json!({ "msg": "Patient removed" })))
}
