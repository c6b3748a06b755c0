//! Walk-in queue sequencing.
//!
//! Queue numbers are assigned as max + 1, computed and inserted while
//! holding a process-wide async mutex so concurrent check-ins cannot read
//! the same maximum. The `UNIQUE(queue_number)` constraint backs this up:
//! if an insert still collides the number is recomputed once under the
//! same guard. Numbers are never reused after removals; the sequence only
//! resets when the whole queue is cleared.

use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::Mutex;

use clinic_core::AppointmentId;

use crate::db::RepositoryError;
use crate::db::queue::QueueRepository;
use crate::models::QueueItem;

/// Queue operation errors.
#[derive(Debug, Error)]
pub enum QueueError {
    /// No queue item matched.
    #[error("patient not found in queue")]
    NotFound,

    /// Clear was requested on an already-empty queue.
    #[error("queue is already empty")]
    Empty,

    /// Underlying repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Assigns queue numbers and performs queue mutations.
pub struct QueueService<'a> {
    pool: &'a SqlitePool,
    lock: &'a Mutex<()>,
}

impl<'a> QueueService<'a> {
    /// Create a new queue service sharing the process-wide check-in lock.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, lock: &'a Mutex<()>) -> Self {
        Self { pool, lock }
    }

    /// Check a patient in, assigning the next queue number.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Repository` if the database rejects the insert.
    pub async fn enqueue(
        &self,
        patient_name: &str,
        appointment_id: Option<AppointmentId>,
    ) -> Result<QueueItem, QueueError> {
        let _guard = self.lock.lock().await;
        let queue = QueueRepository::new(self.pool);

        let next = queue.max_number().await?.map_or(1, |n| n + 1);

        match queue.insert(patient_name, next, appointment_id).await {
            Ok(item) => Ok(item),
            Err(RepositoryError::Conflict(_)) => {
                // Unique-number backstop fired; recompute under the guard
                // we still hold.
                let next = queue.max_number().await?.map_or(1, |n| n + 1);
                Ok(queue.insert(patient_name, next, appointment_id).await?)
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Remove a patient from the queue by name.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::NotFound` if no queue item matches.
    pub async fn dequeue(&self, patient_name: &str) -> Result<(), QueueError> {
        let removed = QueueRepository::new(self.pool)
            .delete_by_name(patient_name)
            .await?;

        if !removed {
            return Err(QueueError::NotFound);
        }

        Ok(())
    }

    /// Clear the whole queue, returning how many items were removed.
    ///
    /// # Errors
    ///
    /// Returns `QueueError::Empty` when there was nothing to clear.
    pub async fn clear(&self) -> Result<u64, QueueError> {
        let removed = QueueRepository::new(self.pool).clear().await?;

        if removed == 0 {
            return Err(QueueError::Empty);
        }

        tracing::info!(removed, "Queue cleared");
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use crate::db::testing;

    use super::*;

    #[tokio::test]
    async fn test_sequence_starts_at_one_and_increments() {
        let pool = testing::pool().await;
        let lock = Mutex::new(());
        let service = QueueService::new(&pool, &lock);

        let alice = service.enqueue("Alice", None).await.unwrap();
        let bob = service.enqueue("Bob", None).await.unwrap();

        assert_eq!(alice.queue_number, 1);
        assert_eq!(bob.queue_number, 2);
    }

    #[tokio::test]
    async fn test_numbers_not_reused_after_removal() {
        let pool = testing::pool().await;
        let lock = Mutex::new(());
        let service = QueueService::new(&pool, &lock);

        service.enqueue("Alice", None).await.unwrap();
        service.enqueue("Bob", None).await.unwrap();
        service.dequeue("Bob").await.unwrap();

        let carol = service.enqueue("Carol", None).await.unwrap();
        assert_eq!(carol.queue_number, 3);
    }

    #[tokio::test]
    async fn test_clear_resets_sequence() {
        let pool = testing::pool().await;
        let lock = Mutex::new(());
        let service = QueueService::new(&pool, &lock);

        service.enqueue("Alice", None).await.unwrap();
        service.enqueue("Bob", None).await.unwrap();

        assert_eq!(service.clear().await.unwrap(), 2);
        assert!(matches!(service.clear().await, Err(QueueError::Empty)));

        let dave = service.enqueue("Dave", None).await.unwrap();
        assert_eq!(dave.queue_number, 1);
    }

    #[tokio::test]
    async fn test_dequeue_unknown_patient() {
        let pool = testing::pool().await;
        let lock = Mutex::new(());
        let service = QueueService::new(&pool, &lock);

        assert!(matches!(
            service.dequeue("Nobody").await,
            Err(QueueError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_checkins_get_distinct_numbers() {
        let pool = Arc::new(testing::pool().await);
        let lock = Arc::new(Mutex::new(()));

        let mut handles = Vec::new();
        for i in 0..10 {
            let pool = Arc::clone(&pool);
            let lock = Arc::clone(&lock);
            handles.push(tokio::spawn(async move {
                QueueService::new(&pool, &lock)
                    .enqueue(&format!("Patient {i}"), None)
                    .await
                    .unwrap()
                    .queue_number
            }));
        }

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap());
        }
        numbers.sort_unstable();

        assert_eq!(numbers, (1..=10).collect::<Vec<i64>>());
    }
}
