//! Domain types for the clinic service.
//!
//! These types represent validated domain objects separate from database row
//! types; the `db` repositories map raw rows into them.

pub mod appointment;
pub mod doctor;
pub mod queue;
pub mod user;

pub use appointment::{Appointment, AppointmentWithDoctor};
pub use doctor::{Doctor, DoctorLogin, DoctorProfile};
pub use queue::QueueItem;
pub use user::FrontDeskUser;
