//! Catalog page fetcher.
//!
//! One page view issues two independent reads: a page of the remote catalog
//! and the set of handles already in the local store. Neither is cached.
//! They run concurrently and are joined before the view is built; dropping
//! the returned future abandons both with no side effects.

use std::collections::HashSet;
use std::sync::Arc;

use catalog_importer_core::{Cursor, Direction, ImportStatus};
use thiserror::Error;
use tracing::{instrument, warn};

use crate::shopify::{ProductPage, ProductSummary, ShopifyError};

use super::{CatalogSource, LocalStore, annotate};

/// A read that failed during a page view.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote catalog could not be reached or returned malformed data.
    #[error("catalog unavailable: {0}")]
    UpstreamUnavailable(#[source] ShopifyError),

    /// The local store's handle set could not be read.
    #[error("local store unavailable: {0}")]
    LocalStoreUnavailable(#[source] ShopifyError),
}

/// Both reads of one page view.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub page: ProductPage,
    pub existing: HashSet<String>,
}

impl CatalogSnapshot {
    /// Page items paired with their import status.
    #[must_use]
    pub fn annotated(&self) -> Vec<(&ProductSummary, ImportStatus)> {
        annotate(&self.page, &self.existing)
    }
}

/// Reads catalog pages and local handles.
#[derive(Clone)]
pub struct CatalogFetcher {
    catalog: Arc<dyn CatalogSource>,
    store: Arc<dyn LocalStore>,
    page_size: i64,
}

impl CatalogFetcher {
    /// Create a fetcher reading `page_size` products per page.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogSource>, store: Arc<dyn LocalStore>, page_size: i64) -> Self {
        Self {
            catalog,
            store,
            page_size,
        }
    }

    /// Products per page.
    #[must_use]
    pub const fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Fetch one page of the remote catalog.
    ///
    /// `None` as the cursor means the first page.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::UpstreamUnavailable` if the catalog read fails.
    #[instrument(skip(self))]
    pub async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        direction: Direction,
    ) -> Result<ProductPage, FetchError> {
        self.catalog
            .fetch_page(cursor, direction, self.page_size)
            .await
            .map_err(|e| {
                warn!(error = %e, "Catalog page read failed");
                FetchError::UpstreamUnavailable(e)
            })
    }

    /// Fetch the set of handles already in the local store.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::LocalStoreUnavailable` if the store read fails.
    #[instrument(skip(self))]
    pub async fn existing_handles(&self) -> Result<HashSet<String>, FetchError> {
        self.store.existing_handles().await.map_err(|e| {
            warn!(error = %e, "Local handle read failed");
            FetchError::LocalStoreUnavailable(e)
        })
    }

    /// Fetch a catalog page and the local handle set concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first `FetchError` either read produces.
    #[instrument(skip(self))]
    pub async fn load(
        &self,
        cursor: Option<&Cursor>,
        direction: Direction,
    ) -> Result<CatalogSnapshot, FetchError> {
        let (page, existing) =
            tokio::try_join!(self.fetch_page(cursor, direction), self.existing_handles())?;

        Ok(CatalogSnapshot { page, existing })
    }
}
