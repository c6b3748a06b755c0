//! Core types for Clinic Desk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{AppointmentId, DoctorId, DoctorLoginId, FrontDeskUserId, QueueItemId};
pub use role::Role;
pub use status::{AppointmentStatus, QueueStatus, StatusParseError};
