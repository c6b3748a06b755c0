//! Business services layered over the repositories.

pub mod auth;
pub mod email;
pub mod provisioning;
pub mod queue;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use email::{CredentialNotifier, NotifyError, SmtpNotifier};
pub use provisioning::{ProvisionError, ProvisionedDoctor, ProvisioningService};
pub use queue::{QueueError, QueueService};
pub use token::{Claims, TokenError, TokenService};
