//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ImporterConfig;
use crate::services::{CatalogFetcher, CatalogSource, LocalStore, Reconciler};
use crate::shopify::{CatalogClient, ShopifyError, StoreClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds no page data: every view is fetched
/// fresh.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    fetcher: CatalogFetcher,
    reconciler: Reconciler,
}

impl AppState {
    /// Build state backed by the real catalog and store clients.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client cannot be built.
    pub fn new(config: &ImporterConfig) -> Result<Self, ShopifyError> {
        let catalog = CatalogClient::new(&config.catalog, config.http_timeout)?;
        let store = StoreClient::new(&config.store, config.http_timeout)?;

        Ok(Self::from_parts(
            Arc::new(catalog),
            Arc::new(store),
            config.catalog.page_size,
        ))
    }

    /// Build state from any catalog source and local store.
    #[must_use]
    pub fn from_parts(
        catalog: Arc<dyn CatalogSource>,
        store: Arc<dyn LocalStore>,
        page_size: i64,
    ) -> Self {
        let fetcher = CatalogFetcher::new(catalog, Arc::clone(&store), page_size);
        let reconciler = Reconciler::new(store);

        Self {
            inner: Arc::new(AppStateInner {
                fetcher,
                reconciler,
            }),
        }
    }

    /// Page and handle reader.
    #[must_use]
    pub fn fetcher(&self) -> &CatalogFetcher {
        &self.inner.fetcher
    }

    /// Guarded importer.
    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.inner.reconciler
    }
}
