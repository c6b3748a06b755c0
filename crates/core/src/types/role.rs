//! Principal role for session tokens and access guards.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The identity class embedded in a session token.
///
/// A token carries exactly one role claim, and each protected endpoint is
/// bound to exactly one required role. A `frontdesk` token is never accepted
/// by a doctor endpoint and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Front-desk staff: registry and queue management.
    FrontDesk,
    /// Doctor: own queue view and patient removal.
    Doctor,
}

impl Role {
    /// The wire representation used in token claims.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FrontDesk => "frontdesk",
            Self::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
