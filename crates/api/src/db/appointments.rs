//! Appointment repository.

use sqlx::SqlitePool;

use clinic_core::{AppointmentId, AppointmentStatus, DoctorId};

use super::RepositoryError;
use crate::models::{Appointment, AppointmentWithDoctor};

#[derive(sqlx::FromRow)]
struct AppointmentRow {
    id: i64,
    patient_name: String,
    doctor_id: i64,
    appointment_time: String,
    status: String,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = RepositoryError;

    fn try_from(r: AppointmentRow) -> Result<Self, Self::Error> {
        let status: AppointmentStatus = r.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid appointment status: {e}"))
        })?;

        Ok(Self {
            id: AppointmentId::new(r.id),
            patient_name: r.patient_name,
            doctor_id: DoctorId::new(r.doctor_id),
            appointment_time: r.appointment_time,
            status,
        })
    }
}

/// Fields of an appointment that may be updated individually.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AppointmentUpdate {
    pub patient_name: Option<String>,
    pub doctor_id: Option<DoctorId>,
    pub appointment_time: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// Repository for appointments.
pub struct AppointmentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AppointmentRepository<'a> {
    /// Create a new appointment repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all appointments with their doctor's name.
    ///
    /// The doctor name is an empty string when the referenced doctor no
    /// longer exists (dangling references are allowed by design).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_doctor(&self) -> Result<Vec<AppointmentWithDoctor>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i64,
            patient_name: String,
            doctor_id: i64,
            doctor_name: String,
            appointment_time: String,
            status: String,
        }

        let rows = sqlx::query_as::<_, Row>(
            r"
            SELECT a.id, a.patient_name, a.doctor_id,
                   COALESCE(d.name, '') AS doctor_name,
                   a.appointment_time, a.status
            FROM appointments a
            LEFT JOIN doctors d ON d.id = a.doctor_id
            ORDER BY a.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                let status: AppointmentStatus = r.status.parse().map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid appointment status: {e}"))
                })?;

                Ok(AppointmentWithDoctor {
                    id: AppointmentId::new(r.id),
                    patient_name: r.patient_name,
                    doctor_id: DoctorId::new(r.doctor_id),
                    doctor_name: r.doctor_name,
                    appointment_time: r.appointment_time,
                    status,
                })
            })
            .collect()
    }

    /// Get an appointment by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, RepositoryError> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r"
            SELECT id, patient_name, doctor_id, appointment_time, status
            FROM appointments
            WHERE id = ?1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(Appointment::try_from).transpose()
    }

    /// Create an appointment. Status is always `booked` regardless of input.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        patient_name: &str,
        doctor_id: DoctorId,
        appointment_time: &str,
    ) -> Result<Appointment, RepositoryError> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r"
            INSERT INTO appointments (patient_name, doctor_id, appointment_time, status)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, patient_name, doctor_id, appointment_time, status
            ",
        )
        .bind(patient_name)
        .bind(doctor_id.as_i64())
        .bind(appointment_time)
        .bind(AppointmentStatus::Booked.as_str())
        .fetch_one(self.pool)
        .await?;

        Appointment::try_from(row)
    }

    /// Apply a partial update to an appointment. Only fields present in
    /// `changes` are written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the appointment doesn't exist.
    pub async fn update(
        &self,
        id: AppointmentId,
        changes: &AppointmentUpdate,
    ) -> Result<Appointment, RepositoryError> {
        let current = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let patient_name = changes
            .patient_name
            .as_deref()
            .unwrap_or(&current.patient_name);
        let doctor_id = changes.doctor_id.unwrap_or(current.doctor_id);
        let appointment_time = changes
            .appointment_time
            .as_deref()
            .unwrap_or(&current.appointment_time);
        let status = changes.status.unwrap_or(current.status);

        let row = sqlx::query_as::<_, AppointmentRow>(
            r"
            UPDATE appointments
            SET patient_name = ?1, doctor_id = ?2, appointment_time = ?3, status = ?4
            WHERE id = ?5
            RETURNING id, patient_name, doctor_id, appointment_time, status
            ",
        )
        .bind(patient_name)
        .bind(doctor_id.as_i64())
        .bind(appointment_time)
        .bind(status.as_str())
        .bind(id.as_i64())
        .fetch_one(self.pool)
        .await?;

        Appointment::try_from(row)
    }

    /// Delete an appointment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the appointment doesn't exist.
    pub async fn delete(&self, id: AppointmentId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM appointments
            WHERE id = ?1
            ",
        )
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete an appointment and any queue item linked to it, in one
    /// transaction.
    ///
    /// Used by the doctor portal's patient removal: the queue item is found
    /// through its `appointment_id` link, never by patient name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the appointment doesn't exist.
    pub async fn delete_with_queue_item(&self, id: AppointmentId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            DELETE FROM queue
            WHERE appointment_id = ?1
            ",
        )
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r"
            DELETE FROM appointments
            WHERE id = ?1
            ",
        )
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}
