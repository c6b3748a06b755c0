//! Walk-in queue repository.

use sqlx::SqlitePool;

use clinic_core::{AppointmentId, DoctorId, QueueItemId, QueueStatus};

use super::{RepositoryError, map_unique_violation};
use crate::models::QueueItem;

#[derive(sqlx::FromRow)]
struct QueueRow {
    id: i64,
    patient_name: String,
    queue_number: i64,
    status: String,
    appointment_id: Option<i64>,
}

impl TryFrom<QueueRow> for QueueItem {
    type Error = RepositoryError;

    fn try_from(r: QueueRow) -> Result<Self, Self::Error> {
        let status: QueueStatus = r.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid queue status: {e}"))
        })?;

        Ok(Self {
            id: QueueItemId::new(r.id),
            patient_name: r.patient_name,
            queue_number: r.queue_number,
            status,
            appointment_id: r.appointment_id.map(AppointmentId::new),
        })
    }
}

/// Repository for the walk-in queue.
pub struct QueueRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> QueueRepository<'a> {
    /// Create a new queue repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all queue items in service order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<QueueItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, QueueRow>(
            r"
            SELECT id, patient_name, queue_number, status, appointment_id
            FROM queue
            ORDER BY queue_number
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(QueueItem::try_from).collect()
    }

    /// List queue items for one doctor, joined through the stable
    /// `appointment_id` link (never by patient name).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_doctor(
        &self,
        doctor_id: DoctorId,
    ) -> Result<Vec<QueueItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, QueueRow>(
            r"
            SELECT q.id, q.patient_name, q.queue_number, q.status, q.appointment_id
            FROM queue q
            JOIN appointments a ON a.id = q.appointment_id
            WHERE a.doctor_id = ?1
            ORDER BY q.queue_number
            ",
        )
        .bind(doctor_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(QueueItem::try_from).collect()
    }

    /// Current highest queue number, or `None` when the queue is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn max_number(&self) -> Result<Option<i64>, RepositoryError> {
        let max = sqlx::query_scalar::<_, Option<i64>>(r"SELECT MAX(queue_number) FROM queue")
            .fetch_one(self.pool)
            .await?;

        Ok(max)
    }

    /// Insert a queue item with an explicit sequence number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the number is already taken
    /// (lost race against a concurrent check-in).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        patient_name: &str,
        queue_number: i64,
        appointment_id: Option<AppointmentId>,
    ) -> Result<QueueItem, RepositoryError> {
        let row = sqlx::query_as::<_, QueueRow>(
            r"
            INSERT INTO queue (patient_name, queue_number, status, appointment_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, patient_name, queue_number, status, appointment_id
            ",
        )
        .bind(patient_name)
        .bind(queue_number)
        .bind(QueueStatus::Waiting.as_str())
        .bind(appointment_id.map(|id| id.as_i64()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "queue number already assigned"))?;

        QueueItem::try_from(row)
    }

    /// Remove a queue item by patient name.
    ///
    /// Returns `true` if an item was removed, `false` if none matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_by_name(&self, patient_name: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM queue
            WHERE patient_name = ?1
            ",
        )
        .bind(patient_name)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all queue items, returning the number removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(r"DELETE FROM queue").execute(self.pool).await?;

        Ok(result.rows_affected())
    }
}
