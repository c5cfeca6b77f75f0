//! Business logic services.
//!
//! - [`fetcher`] - Reads one catalog page and the local handle set
//! - [`reconciler`] - Derives import status and performs guarded imports
//! - [`description`] - Plain text to rich-text HTML and table excerpts
//!
//! Services talk to Shopify through the [`CatalogSource`] and [`LocalStore`]
//! traits so they can run against in-memory doubles in tests.

pub mod description;
pub mod fetcher;
pub mod reconciler;

use std::collections::HashSet;

use async_trait::async_trait;
use catalog_importer_core::{Cursor, Direction};

use crate::shopify::{
    CatalogClient, CreatedProduct, NewProduct, ProductPage, ShopifyError, StoreClient,
};

pub use fetcher::{CatalogFetcher, CatalogSnapshot, FetchError};
pub use reconciler::{ImportCommand, ImportError, Reconciler, annotate};

/// A remote source of product pages.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch `page_size` products on the `direction` side of `cursor`.
    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        direction: Direction,
        page_size: i64,
    ) -> Result<ProductPage, ShopifyError>;
}

/// The merchant's own store.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Every product handle currently in the store.
    async fn existing_handles(&self) -> Result<HashSet<String>, ShopifyError>;

    /// The product with `handle`, if any.
    async fn find_by_handle(&self, handle: &str) -> Result<Option<CreatedProduct>, ShopifyError>;

    /// Create a product.
    async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, ShopifyError>;
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        direction: Direction,
        page_size: i64,
    ) -> Result<ProductPage, ShopifyError> {
        self.get_page(cursor, direction, page_size).await
    }
}

#[async_trait]
impl LocalStore for StoreClient {
    async fn existing_handles(&self) -> Result<HashSet<String>, ShopifyError> {
        self.get_existing_handles().await
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<CreatedProduct>, ShopifyError> {
        self.find_product_by_handle(handle).await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, ShopifyError> {
        Self::create_product(self, product).await
    }
}
