//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::WebConfig;
use crate::services::auth::GoogleClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    pool: PgPool,
    google: Option<GoogleClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Google client exists only when the `google` provider is enabled
    /// in configuration.
    #[must_use]
    pub fn new(config: WebConfig, pool: PgPool) -> Self {
        let google = config.google.as_ref().map(GoogleClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                google,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Google `OpenID` Connect client, if enabled.
    #[must_use]
    pub fn google(&self) -> Option<&GoogleClient> {
        self.inner.google.as_ref()
    }
}
