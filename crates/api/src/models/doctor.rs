//! Doctor and doctor-login domain types.

use serde::{Deserialize, Serialize};

use clinic_core::{DoctorId, DoctorLoginId, Email};

/// A doctor's profile record.
#[derive(Debug, Clone, Serialize)]
pub struct Doctor {
    /// Unique doctor ID.
    pub id: DoctorId,
    /// Display name.
    pub name: String,
    /// Medical specialization.
    pub specialization: String,
    /// Gender as entered by the front desk.
    pub gender: String,
    /// Contact email; credentials are delivered here at provisioning time.
    pub email: Email,
}

/// Profile data supplied when provisioning a new doctor.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorProfile {
    pub name: String,
    pub specialization: String,
    pub gender: String,
    pub email: Email,
}

/// A doctor's portal login record.
///
/// Paired 1:1 with a [`Doctor`]: created in the same transaction at
/// provisioning time and deleted in the same transaction as the doctor.
/// The password hash stays in the database layer.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorLogin {
    /// Unique login record ID.
    pub id: DoctorLoginId,
    /// The doctor this login belongs to.
    pub doctor_id: DoctorId,
    /// Generated 6-digit username (unique).
    pub username: String,
}
