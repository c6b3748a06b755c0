//! Walk-in queue domain type.

use serde::Serialize;

use clinic_core::{AppointmentId, QueueItemId, QueueStatus};

/// A walk-in patient waiting to be seen.
#[derive(Debug, Clone, Serialize)]
pub struct QueueItem {
    /// Unique queue item ID.
    pub id: QueueItemId,
    /// Patient display name.
    pub patient_name: String,
    /// Strictly increasing service-order number; unique for the lifetime of
    /// the queue (reset only by a bulk clear).
    pub queue_number: i64,
    /// Queue status; `waiting` at check-in.
    pub status: QueueStatus,
    /// Stable link to the patient's appointment, if they have one. Doctor
    /// queue views filter through this rather than joining on patient name.
    pub appointment_id: Option<AppointmentId>,
}
