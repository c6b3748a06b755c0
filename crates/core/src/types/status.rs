//! Status enums for appointments and queue items.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error parsing a status value from its stored text form.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown status value: {0}")]
pub struct StatusParseError(pub String);

/// Appointment lifecycle status.
///
/// Every appointment is created as `booked` regardless of client input;
/// the front desk moves it forward from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Booked,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Stored text form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "booked",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(Self::Booked),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

/// Walk-in queue item status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    #[default]
    Waiting,
    Called,
    Done,
}

impl QueueStatus {
    /// Stored text form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Called => "called",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QueueStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "called" => Ok(Self::Called),
            "done" => Ok(Self::Done),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_status_roundtrip() {
        for status in [
            AppointmentStatus::Booked,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ] {
            let parsed: AppointmentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_queue_status_roundtrip() {
        for status in [QueueStatus::Waiting, QueueStatus::Called, QueueStatus::Done] {
            let parsed: QueueStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("checked-in".parse::<QueueStatus>().is_err());
        assert!("".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn test_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Booked).unwrap(),
            "\"booked\""
        );
        assert_eq!(
            serde_json::to_string(&QueueStatus::Waiting).unwrap(),
            "\"waiting\""
        );
    }
}
