//! Doctor and doctor-login repository.
//!
//! The doctor/login pairing invariant lives here: `create_with_login` and
//! `delete_with_login` each run both writes in one transaction, so a doctor
//! row and its login row always appear and disappear together.

use sqlx::SqlitePool;

use clinic_core::{DoctorId, DoctorLoginId, Email};

use super::{RepositoryError, map_unique_violation};
use crate::models::{Doctor, DoctorLogin, DoctorProfile};

#[derive(sqlx::FromRow)]
struct DoctorRow {
    id: i64,
    name: String,
    specialization: String,
    gender: String,
    email: String,
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = RepositoryError;

    fn try_from(r: DoctorRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: DoctorId::new(r.id),
            name: r.name,
            specialization: r.specialization,
            gender: r.gender,
            email,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LoginRow {
    id: i64,
    doctor_id: i64,
    username: String,
}

impl From<LoginRow> for DoctorLogin {
    fn from(r: LoginRow) -> Self {
        Self {
            id: DoctorLoginId::new(r.id),
            doctor_id: DoctorId::new(r.doctor_id),
            username: r.username,
        }
    }
}

/// Fields of a doctor profile that may be updated individually.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DoctorUpdate {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub gender: Option<String>,
    pub email: Option<Email>,
}

/// Repository for doctors and their portal logins.
pub struct DoctorRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DoctorRepository<'a> {
    /// Create a new doctor repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List doctors, optionally filtered by a case-insensitive substring of
    /// their specialization.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        specialization: Option<&str>,
    ) -> Result<Vec<Doctor>, RepositoryError> {
        let rows = match specialization {
            Some(filter) => {
                sqlx::query_as::<_, DoctorRow>(
                    r"
                    SELECT id, name, specialization, gender, email
                    FROM doctors
                    WHERE specialization LIKE '%' || ?1 || '%'
                    ORDER BY id
                    ",
                )
                .bind(filter)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DoctorRow>(
                    r"
                    SELECT id, name, specialization, gender, email
                    FROM doctors
                    ORDER BY id
                    ",
                )
                .fetch_all(self.pool)
                .await?
            }
        };

        rows.into_iter().map(Doctor::try_from).collect()
    }

    /// Get a doctor by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: DoctorId) -> Result<Option<Doctor>, RepositoryError> {
        let row = sqlx::query_as::<_, DoctorRow>(
            r"
            SELECT id, name, specialization, gender, email
            FROM doctors
            WHERE id = ?1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(Doctor::try_from).transpose()
    }

    /// Check whether a portal username is already taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn username_taken(&self, username: &str) -> Result<bool, RepositoryError> {
        let taken = sqlx::query_scalar::<_, i64>(
            r"
            SELECT EXISTS (SELECT 1 FROM doctor_logins WHERE username = ?1)
            ",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;

        Ok(taken != 0)
    }

    /// Insert a doctor and its login record in one transaction.
    ///
    /// Both rows land or neither does, preserving the pairing invariant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or generated username
    /// is already taken (no doctor row persists in that case).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_login(
        &self,
        profile: &DoctorProfile,
        username: &str,
        password_hash: &str,
    ) -> Result<Doctor, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, DoctorRow>(
            r"
            INSERT INTO doctors (name, specialization, gender, email)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, specialization, gender, email
            ",
        )
        .bind(&profile.name)
        .bind(&profile.specialization)
        .bind(&profile.gender)
        .bind(profile.email.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "doctor email already registered"))?;

        sqlx::query(
            r"
            INSERT INTO doctor_logins (doctor_id, username, password_hash)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(row.id)
        .bind(username)
        .bind(password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "portal username already taken"))?;

        tx.commit().await?;

        Doctor::try_from(row)
    }

    /// Apply a partial update to a doctor. Only fields present in `changes`
    /// are written; the rest keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the doctor doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new email is taken.
    pub async fn update(
        &self,
        id: DoctorId,
        changes: &DoctorUpdate,
    ) -> Result<Doctor, RepositoryError> {
        let current = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        let name = changes.name.as_deref().unwrap_or(&current.name);
        let specialization = changes
            .specialization
            .as_deref()
            .unwrap_or(&current.specialization);
        let gender = changes.gender.as_deref().unwrap_or(&current.gender);
        let email = changes.email.as_ref().unwrap_or(&current.email);

        let row = sqlx::query_as::<_, DoctorRow>(
            r"
            UPDATE doctors
            SET name = ?1, specialization = ?2, gender = ?3, email = ?4
            WHERE id = ?5
            RETURNING id, name, specialization, gender, email
            ",
        )
        .bind(name)
        .bind(specialization)
        .bind(gender)
        .bind(email.as_str())
        .bind(id.as_i64())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "doctor email already registered"))?;

        Doctor::try_from(row)
    }

    /// Delete a doctor and its login record in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the doctor doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete_with_login(&self, id: DoctorId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            DELETE FROM doctor_logins
            WHERE doctor_id = ?1
            ",
        )
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r"
            DELETE FROM doctors
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

    /// Get a login record by its portal username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_login_by_username(
        &self,
        username: &str,
    ) -> Result<Option<DoctorLogin>, RepositoryError> {
        let row = sqlx::query_as::<_, LoginRow>(
            r"
            SELECT id, doctor_id, username
            FROM doctor_logins
            WHERE username = ?1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a login record along with its password hash, for login
    /// verification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_login_with_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(DoctorLogin, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i64,
            doctor_id: i64,
            username: String,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, Row>(
            r"
            SELECT id, doctor_id, username, password_hash
            FROM doctor_logins
            WHERE username = ?1
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| {
            (
                DoctorLogin {
                    id: DoctorLoginId::new(r.id),
                    doctor_id: DoctorId::new(r.doctor_id),
                    username: r.username,
                },
                r.password_hash,
            )
        }))
    }

    /// Count login records, used by tests to assert pairing atomicity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_logins(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(r"SELECT COUNT(*) FROM doctor_logins")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
