//! Doctor provisioning.
//!
//! Creating a doctor is a strictly ordered pipeline: generate credentials,
//! check the username is free, deliver the credentials by email, then write
//! the doctor and login rows in one transaction. Delivery happens before
//! the writes so a doctor never exists without having received working
//! credentials; a delivery failure aborts the whole attempt and leaves no
//! rows behind.

use rand::Rng;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::db::doctors::DoctorRepository;
use crate::models::{Doctor, DoctorProfile};

use super::auth::hash_password;
use super::email::{CredentialNotifier, NotifyError};

/// Generated portal passwords are this many alphanumeric characters.
const PASSWORD_LENGTH: usize = 8;

/// Attempts at finding a free generated username before giving up.
const MAX_USERNAME_ATTEMPTS: usize = 5;

/// Provisioning errors.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// No free username found within the attempt budget.
    #[error("could not generate an unused portal username")]
    UsernameSpaceExhausted,

    /// Credential delivery failed; nothing was written.
    #[error("credential delivery failed: {0}")]
    Notification(#[from] NotifyError),

    /// Email or username collided at insert time.
    #[error("{0}")]
    Conflict(String),

    /// Failed to hash the generated password.
    #[error("failed to hash password")]
    PasswordHash,

    /// Underlying repository error.
    #[error("repository error: {0}")]
    Storage(#[from] RepositoryError),
}

/// A provisioned doctor with the plaintext credentials that were emailed.
///
/// The password exists only here and in the email; it is never stored.
pub struct ProvisionedDoctor {
    pub doctor: Doctor,
    pub username: String,
    pub password: String,
}

/// Provisions doctor accounts: profile row, portal login, and credential
/// email, as one all-or-nothing operation.
pub struct ProvisioningService<'a> {
    pool: &'a SqlitePool,
    notifier: &'a dyn CredentialNotifier,
}

impl<'a> ProvisioningService<'a> {
    /// Create a new provisioning service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, notifier: &'a dyn CredentialNotifier) -> Self {
        Self { pool, notifier }
    }

    /// Provision a doctor account end to end.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Notification` if the credential email
    /// cannot be delivered (no rows are written in that case), and
    /// `ProvisionError::Conflict` if the email or username is taken.
    pub async fn provision_doctor(
        &self,
        profile: &DoctorProfile,
    ) -> Result<ProvisionedDoctor, ProvisionError> {
        let doctors = DoctorRepository::new(self.pool);

        // Settle on a free username before sending anything, so the
        // credentials in the email match what gets stored.
        let mut credentials = None;
        for _ in 0..MAX_USERNAME_ATTEMPTS {
            let (username, password) = generate_credentials();
            if !doctors.username_taken(&username).await? {
                credentials = Some((username, password));
                break;
            }
        }
        let (username, password) = credentials.ok_or(ProvisionError::UsernameSpaceExhausted)?;

        self.notifier
            .deliver_credentials(&profile.email, &profile.name, &username, &password)
            .await?;

        let password_hash = hash_password(&password).map_err(|_| ProvisionError::PasswordHash)?;

        let doctor = doctors
            .create_with_login(profile, &username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(msg) => ProvisionError::Conflict(msg),
                other => ProvisionError::Storage(other),
            })?;

        tracing::info!(doctor_id = %doctor.id, "Doctor provisioned");

        Ok(ProvisionedDoctor {
            doctor,
            username,
            password,
        })
    }
}

/// Generate a random username (6 digits) and password (8 alphanumerics).
#[must_use]
pub fn generate_credentials() -> (String, String) {
    let username: u32 = rand::rng().random_range(100_000..1_000_000);

    let password: String = rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(PASSWORD_LENGTH)
        .map(char::from)
        .collect();

    (username.to_string(), password)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use clinic_core::Email;

    use crate::db::testing;
    use crate::services::auth::verify_password;

    use super::*;

    /// Records deliveries instead of sending them.
    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl CredentialNotifier for RecordingNotifier {
        async fn deliver_credentials(
            &self,
            to: &Email,
            _doctor_name: &str,
            username: &str,
            password: &str,
        ) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push((
                to.as_str().to_owned(),
                username.to_owned(),
                password.to_owned(),
            ));
            Ok(())
        }
    }

    /// Always refuses delivery.
    struct FailingNotifier;

    #[async_trait]
    impl CredentialNotifier for FailingNotifier {
        async fn deliver_credentials(
            &self,
            _to: &Email,
            _doctor_name: &str,
            _username: &str,
            _password: &str,
        ) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected("relay unavailable".to_owned()))
        }
    }

    fn profile(email: &str) -> DoctorProfile {
        DoctorProfile {
            name: "Meredith Grey".to_owned(),
            specialization: "General Surgery".to_owned(),
            gender: "female".to_owned(),
            email: Email::parse(email).unwrap(),
        }
    }

    #[test]
    fn test_generated_credential_shape() {
        for _ in 0..50 {
            let (username, password) = generate_credentials();
            assert_eq!(username.len(), 6);
            assert!(username.chars().all(|c| c.is_ascii_digit()));
            assert_eq!(password.len(), PASSWORD_LENGTH);
            assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[tokio::test]
    async fn test_provision_emails_before_insert() {
        let pool = testing::pool().await;
        let notifier = RecordingNotifier::default();
        let service = ProvisioningService::new(&pool, &notifier);

        let provisioned = service
            .provision_doctor(&profile("grey@clinic.test"))
            .await
            .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (to, username, password) = &sent[0];
        assert_eq!(to, "grey@clinic.test");

        // The emailed credentials are the ones that work.
        assert_eq!(*username, provisioned.username);
        assert_eq!(*password, provisioned.password);

        let doctors = DoctorRepository::new(&pool);
        let (login, hash) = doctors
            .get_login_with_password_hash(username)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(login.doctor_id, provisioned.doctor.id);
        assert!(verify_password(password, &hash).is_ok());
    }

    #[tokio::test]
    async fn test_delivery_failure_leaves_no_rows() {
        let pool = testing::pool().await;
        let service = ProvisioningService::new(&pool, &FailingNotifier);

        let result = service.provision_doctor(&profile("grey@clinic.test")).await;
        assert!(matches!(result, Err(ProvisionError::Notification(_))));

        let doctors = DoctorRepository::new(&pool);
        assert!(doctors.list(None).await.unwrap().is_empty());
        assert_eq!(doctors.count_logins().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_and_keeps_first() {
        let pool = testing::pool().await;
        let notifier = RecordingNotifier::default();
        let service = ProvisioningService::new(&pool, &notifier);

        service
            .provision_doctor(&profile("grey@clinic.test"))
            .await
            .unwrap();

        let result = service.provision_doctor(&profile("grey@clinic.test")).await;
        assert!(matches!(result, Err(ProvisionError::Conflict(_))));

        let doctors = DoctorRepository::new(&pool);
        assert_eq!(doctors.list(None).await.unwrap().len(), 1);
        assert_eq!(doctors.count_logins().await.unwrap(), 1);
    }
}
