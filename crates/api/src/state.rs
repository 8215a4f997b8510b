//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::PgCatalog;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Pre-bill state itself is not held here; it
/// lives in each request's session. The catalog defaults to [`PgCatalog`];
/// any [`kirana_prebill::Catalog`] can be plugged in with
/// [`AppState::with_catalog`].
pub struct AppState<C = PgCatalog> {
    inner: Arc<AppStateInner<C>>,
}

struct AppStateInner<C> {
    config: ApiConfig,
    pool: PgPool,
    catalog: C,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AppState {
    /// Create a new application state reading the catalog from `pool`.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let catalog = PgCatalog::new(pool.clone(), config.catalog_cache_ttl);
        Self::with_catalog(config, pool, catalog)
    }
}

impl<C> AppState<C> {
    /// Create a new application state with an explicit catalog.
    #[must_use]
    pub fn with_catalog(config: ApiConfig, pool: PgPool, catalog: C) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the catalog.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.inner.catalog
    }
}
