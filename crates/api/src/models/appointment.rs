//! Appointment domain types.

use serde::Serialize;

use clinic_core::{AppointmentId, AppointmentStatus, DoctorId};

/// A booked appointment.
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    /// Unique appointment ID.
    pub id: AppointmentId,
    /// Patient display name.
    pub patient_name: String,
    /// The doctor the appointment is with. Deleting a doctor does not cascade
    /// here; a dangling reference renders with an empty doctor name.
    pub doctor_id: DoctorId,
    /// Scheduled time as entered by the front desk.
    pub appointment_time: String,
    /// Lifecycle status; always `booked` at creation.
    pub status: AppointmentStatus,
}

/// An appointment joined with its doctor's name for listings.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentWithDoctor {
    pub id: AppointmentId,
    pub patient_name: String,
    pub doctor_id: DoctorId,
    /// Empty string when the doctor no longer exists.
    pub doctor_name: String,
    pub appointment_time: String,
    pub status: AppointmentStatus,
}
