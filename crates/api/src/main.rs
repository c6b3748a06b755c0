//! Clinic API - front-desk and doctor-portal backend.
//!
//! # Architecture
//!
//! - Axum JSON-over-HTTP API with bearer-token auth
//! - `SQLite` for persistence (front-desk users, doctors, appointments, queue)
//! - SMTP credential delivery at doctor provisioning time
//!
//! Two roles, two token audiences: front-desk tokens work on the registry
//! and queue endpoints, doctor tokens only on the portal endpoints.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::ExposeSecret;

use clinic_api::config::ClinicConfig;
use clinic_api::services::auth::AuthService;
use clinic_api::services::email::SmtpNotifier;
use clinic_api::state::AppState;
use clinic_api::{app, db};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ClinicConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clinic_api=info,tower_http=debug".into());

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Initialize database connection pool and apply migrations
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database ready");

    // SMTP notifier for doctor credential delivery
    let notifier =
        Arc::new(SmtpNotifier::new(&config.email).expect("Failed to configure SMTP transport"));

    let state = AppState::new(config.clone(), pool, notifier);

    // Create the bootstrap front-desk account if configured
    if let Some(bootstrap) = &config.bootstrap {
        let auth = AuthService::new(state.pool(), state.tokens());
        auth.seed_frontdesk_user(&bootstrap.username, bootstrap.password.expose_secret())
            .await
            .expect("Failed to seed bootstrap user");
    }

    let app = app(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("clinic api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
