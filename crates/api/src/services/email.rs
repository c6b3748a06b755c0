//! Credential delivery over SMTP.
//!
//! Provisioning talks to a [`CredentialNotifier`] trait rather than a
//! concrete transport so tests can substitute a recording or failing
//! implementation. Delivery failures are returned, never swallowed:
//! provisioning must abort when the notifier reports an error.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use clinic_core::Email;

use crate::config::EmailConfig;

/// Errors that can occur when delivering credentials.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Delivery refused by a test double.
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Delivers freshly generated portal credentials to a doctor.
#[async_trait]
pub trait CredentialNotifier: Send + Sync {
    /// Deliver a username and password to the doctor's email address.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError` when delivery fails; the caller must treat
    /// that as fatal for the provisioning attempt.
    async fn deliver_credentials(
        &self,
        to: &Email,
        doctor_name: &str,
        username: &str,
        password: &str,
    ) -> Result<(), NotifyError>;
}

/// SMTP-backed credential notifier.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    /// Create a new notifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl CredentialNotifier for SmtpNotifier {
    async fn deliver_credentials(
        &self,
        to: &Email,
        doctor_name: &str,
        username: &str,
        password: &str,
    ) -> Result<(), NotifyError> {
        let body = format!(
            "Dear Dr. {doctor_name},\n\n\
             Your doctor portal account has been created.\n\n\
             Username: {username}\n\
             Password: {password}\n\n\
             Please log in and keep these credentials safe.\n",
        );

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(to.as_str().to_string()))?)
            .subject("Your Doctor Portal Credentials")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, "Credential email sent");
        Ok(())
    }
}
