//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::config::ClinicConfig;
use crate::services::email::CredentialNotifier;
use crate::services::token::TokenService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the connection pool, token service, and the
/// process-wide queue check-in lock.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ClinicConfig,
    pool: SqlitePool,
    tokens: TokenService,
    notifier: Arc<dyn CredentialNotifier>,
    queue_lock: Mutex<()>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ClinicConfig,
        pool: SqlitePool,
        notifier: Arc<dyn CredentialNotifier>,
    ) -> Self {
        let tokens = TokenService::new(&config.token_secret, config.token_ttl_minutes);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                notifier,
                queue_lock: Mutex::new(()),
            }),
        }
    }

    /// Get a reference to the clinic configuration.
    #[must_use]
    pub fn config(&self) -> &ClinicConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the credential notifier.
    #[must_use]
    pub fn notifier(&self) -> &dyn CredentialNotifier {
        self.inner.notifier.as_ref()
    }

    /// Get a reference to the queue check-in lock.
    ///
    /// All queue-number assignment happens while holding this mutex.
    #[must_use]
    pub fn queue_lock(&self) -> &Mutex<()> {
        &self.inner.queue_lock
    }
}
