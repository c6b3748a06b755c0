//! HTTP route handlers for the clinic API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//!
//! # Auth
//! POST   /register                  - Register a front-desk user
//! POST   /frontdesk/login           - Front-desk login (bearer token)
//! POST   /doctor/login              - Doctor portal login (bearer token)
//!
//! # Doctors (front-desk token required)
//! GET    /doctors                   - List doctors (?specialization= filter)
//! POST   /doctors                   - Provision a doctor (profile + login + email)
//! GET    /doctors/{id}              - Doctor detail
//! PUT    /doctors/{id}              - Partial profile update
//! DELETE /doctors/{id}              - Delete doctor and its login
//!
//! # Appointments (front-desk token required)
//! GET    /appointments              - List with doctor names
//! POST   /appointments              - Book (status always starts as booked)
//! GET    /appointments/{id}         - Appointment detail
//! PUT    /appointments/{id}         - Partial update
//! DELETE /appointments/{id}         - Cancel
//!
//! # Walk-in queue (front-desk token required)
//! GET    /queue                     - List in service order
//! POST   /queue                     - Check a patient in (assigns next number)
//! DELETE /queue/{patient_name}      - Remove a patient from the queue
//! DELETE /queue-deleteall           - Clear the queue (404 when already empty)
//!
//! # Doctor portal (doctor token required)
//! GET    /doctor-queue              - This doctor's queue (404 when empty)
//! DELETE /doctorremovepatient/{id}  - Remove own appointment and its queue item
//! ```

pub mod appointments;
pub mod auth;
pub mod doctor_portal;
pub mod doctors;
pub mod queue;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/register", post(auth::register))
        .route("/frontdesk/login", post(auth::frontdesk_login))
        .route("/doctor/login", post(auth::doctor_login))
        .route(
            "/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/doctors/{id}",
            get(doctors::get_doctor)
                .put(doctors::update_doctor)
                .delete(doctors::delete_doctor),
        )
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/appointments/{id}",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route("/queue", get(queue::list_queue).post(queue::check_in))
        .route("/queue/{patient_name}", delete(queue::remove_from_queue))
        .route("/queue-deleteall", delete(queue::clear_queue))
        .route("/doctor-queue", get(doctor_portal::my_queue))
        .route(
            "/doctorremovepatient/{id}",
            delete(doctor_portal::remove_patient),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
