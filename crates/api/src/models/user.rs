//! Front-desk principal domain type.

use serde::Serialize;

use clinic_core::FrontDeskUserId;

/// A front-desk staff account.
///
/// Created once at registration and never updated or deleted. The password
/// hash stays in the database layer; this type is what guards and handlers
/// see after authentication.
#[derive(Debug, Clone, Serialize)]
pub struct FrontDeskUser {
    /// Unique user ID.
    pub id: FrontDeskUserId,
    /// Login username (unique).
    pub username: String,
}
