//! Walk-in queue handlers (front-desk only).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use clinic_core::AppointmentId;

use crate::db::queue::QueueRepository;
use crate::error::ApiError;
use crate::middleware::RequireFrontDesk;
use crate::models::QueueItem;
use crate::services::queue::QueueService;
use crate::state::AppState;

/// Check-in request. Linking an appointment lets the doctor portal see
/// the patient in its own queue view.
#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub patient_name: String,
    pub appointment_id: Option<AppointmentId>,
}

/// List the queue in service order.
///
/// GET /queue
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_queue(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
) -> Result<Json<Vec<QueueItem>>, ApiError> {
    let items = QueueRepository::new(state.pool()).list().await?;

    Ok(Json(items))
}

/// Check a patient in, assigning the next queue number.
///
/// POST /queue
///
/// # Errors
///
/// Returns 500 if the insert fails.
pub async fn check_in(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Json(req): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<QueueItem>), ApiError> {
    let service = QueueService::new(state.pool(), state.queue_lock());
    let item = service.enqueue(&req.patient_name, req.appointment_id).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Remove a patient from the queue by name.
///
/// DELETE /queue/{patient_name}
///
/// # Errors
///
/// Returns 404 if no queue item matches.
pub async fn remove_from_queue(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
    Path(patient_name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let service = QueueService::new(state.pool(), state.queue_lock());
    service.dequeue(&patient_name).await?;

    Ok(Json(serde_json::json!({ "msg": "Patient removed from queue" })))
}

/// Clear the whole queue.
///
/// DELETE /queue-deleteall
///
/// # Errors
///
/// Returns 404 when the queue is already empty.
pub async fn clear_queue(
    State(state): State<AppState>,
    RequireFrontDesk(_user): RequireFrontDesk,
) -> Result<Json<serde_json::Value>, ApiError> {
    let service = QueueService::new(state.pool(), state.queue_lock());
    let removed = service.clear().await?;

    Ok(Json(serde_json::json!({
        "msg": "Queue cleared",
        "removed": removed,
    })))
}
