//! Integration tests for the catalog importer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p catalog-importer-integration-tests
//! ```
//!
//! # Test Doubles
//!
//! - [`MemoryCatalog`] - remote catalog with opaque cursors and failure toggle
//! - [`MemoryStore`] - local store with rejection, outage and a gate that holds
//!   `create_product` open for concurrency tests
//!
//! Both count their calls so tests can assert that nothing is cached.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use catalog_importer::services::{CatalogSource, LocalStore};
use catalog_importer::shopify::{
    CreatedProduct, NewProduct, PageInfo, ProductPage, ProductSummary, ShopifyError, UserError,
};
use catalog_importer_core::{Cursor, Direction, Price, ShopifyGid};
use rust_decimal::Decimal;
use tokio::sync::Notify;

/// Product gid for a numeric local id.
///
/// # Panics
///
/// Never: a decimal number is always a valid local id.
#[allow(clippy::expect_used)]
#[must_use]
pub fn product_gid(n: u64) -> ShopifyGid {
    ShopifyGid::product(&n.to_string()).expect("numeric id is a valid gid")
}

/// Build a catalog product with handle `product-{n}`.
#[must_use]
pub fn sample_product(n: usize) -> ProductSummary {
    ProductSummary {
        id: product_gid(n as u64),
        title: format!("Product {n}"),
        handle: format!("product-{n}"),
        description: format!("Description of product {n}.\nSecond line."),
        image_url: Some(format!("https://cdn.example.test/{n}/featured.jpg")),
        image_urls: vec![
            format!("https://cdn.example.test/{n}/1.jpg"),
            format!("https://cdn.example.test/{n}/2.jpg"),
        ],
        price: Price::new(Decimal::new(195, 1), "USD"),
        category: None,
        collections: vec!["Featured".to_string()],
        options: vec!["Size".to_string()],
        variant_count: 2,
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// In-memory remote catalog.
///
/// Cursors are opaque tokens minted per item; callers can only round-trip
/// them.
pub struct MemoryCatalog {
    products: Vec<ProductSummary>,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryCatalog {
    /// A catalog of `count` products, `product-0` through `product-{count-1}`.
    #[must_use]
    pub fn with_products(count: usize) -> Self {
        Self::new((0..count).map(sample_product).collect())
    }

    #[must_use]
    pub const fn new(products: Vec<ProductSummary>) -> Self {
        Self {
            products,
            unavailable: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent read fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of page reads served.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn cursor_for(index: usize) -> Cursor {
        Cursor::new(format!("opaque-{:08x}", index ^ 0x5a5a))
    }

    fn index_of(&self, cursor: &Cursor) -> Result<usize, ShopifyError> {
        cursor
            .as_str()
            .strip_prefix("opaque-")
            .and_then(|hex| usize::from_str_radix(hex, 16).ok())
            .map(|masked| masked ^ 0x5a5a)
            .filter(|index| *index < self.products.len())
            .ok_or_else(|| ShopifyError::Malformed(format!("unknown cursor {cursor}")))
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn fetch_page(
        &self,
        cursor: Option<&Cursor>,
        direction: Direction,
        page_size: i64,
    ) -> Result<ProductPage, ShopifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ShopifyError::Malformed("catalog offline".to_string()));
        }

        let size = usize::try_from(page_size.max(1)).unwrap_or(1);
        let len = self.products.len();

        let (start, end) = match (direction, cursor) {
            (Direction::Forward, Some(cursor)) => {
                let start = self.index_of(cursor)? + 1;
                (start, (start + size).min(len))
            }
            (Direction::Backward, Some(cursor)) => {
                let end = self.index_of(cursor)?;
                (end.saturating_sub(size), end)
            }
            (_, None) => (0, size.min(len)),
        };

        let products = self.products.get(start..end).unwrap_or_default().to_vec();
        let (start_cursor, end_cursor) = if products.is_empty() {
            (None, None)
        } else {
            (Some(Self::cursor_for(start)), Some(Self::cursor_for(end - 1)))
        };

        Ok(ProductPage {
            products,
            page_info: PageInfo {
                has_previous_page: start > 0,
                has_next_page: end < len,
                start_cursor,
                end_cursor,
            },
        })
    }
}

// =============================================================================
// Store
// =============================================================================

/// In-memory local store.
#[derive(Default)]
pub struct MemoryStore {
    products: Mutex<Vec<CreatedProduct>>,
    created: Mutex<Vec<NewProduct>>,
    rejection: Mutex<Option<Vec<UserError>>>,
    unavailable: AtomicBool,
    next_id: AtomicU64,
    handle_reads: AtomicUsize,
    create_calls: AtomicUsize,
    gate: Option<Gate>,
}

struct Gate {
    entered: Notify,
    release: Notify,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `create_product` waits for [`Self::release_create`].
    #[must_use]
    pub fn gated() -> Self {
        Self {
            gate: Some(Gate {
                entered: Notify::new(),
                release: Notify::new(),
            }),
            ..Self::default()
        }
    }

    /// Add a product as if it had been created out of band.
    pub fn insert(&self, handle: &str) -> CreatedProduct {
        let product = CreatedProduct {
            id: self.mint_id(),
            handle: handle.to_string(),
        };
        lock(&self.products).push(product.clone());
        product
    }

    /// Reject the next creations with these user errors.
    pub fn reject_with(&self, errors: Vec<UserError>) {
        *lock(&self.rejection) = Some(errors);
    }

    /// Make every subsequent request fail at the transport level.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Wait until a gated `create_product` call has started.
    pub async fn wait_for_create(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    /// Let a gated `create_product` call finish.
    pub fn release_create(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }

    /// Creation requests received, successful or not.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Handle set reads served.
    #[must_use]
    pub fn handle_reads(&self) -> usize {
        self.handle_reads.load(Ordering::SeqCst)
    }

    /// Creation requests that produced a product.
    #[must_use]
    pub fn created(&self) -> Vec<NewProduct> {
        lock(&self.created).clone()
    }

    #[must_use]
    pub fn handles(&self) -> HashSet<String> {
        lock(&self.products)
            .iter()
            .map(|p| p.handle.clone())
            .collect()
    }

    fn mint_id(&self) -> ShopifyGid {
        product_gid(1000 + self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn check_available(&self) -> Result<(), ShopifyError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(ShopifyError::RateLimited(1))
        } else {
            Ok(())
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn existing_handles(&self) -> Result<HashSet<String>, ShopifyError> {
        self.handle_reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.handles())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<CreatedProduct>, ShopifyError> {
        self.check_available()?;
        Ok(lock(&self.products)
            .iter()
            .find(|p| p.handle == handle)
            .cloned())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<CreatedProduct, ShopifyError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        self.check_available()?;
        if let Some(errors) = lock(&self.rejection).clone() {
            return Err(ShopifyError::UserErrors(errors));
        }

        let created = self.insert(&product.handle);
        lock(&self.created).push(product.clone());
        Ok(created)
    }
}

/// Shared doubles plus the reconciler and fetcher wired to them.
pub struct Harness {
    pub catalog: Arc<MemoryCatalog>,
    pub store: Arc<MemoryStore>,
    pub state: catalog_importer::state::AppState,
}

impl Harness {
    /// Wire a catalog of `count` products and an empty store.
    #[must_use]
    pub fn new(count: usize, page_size: i64) -> Self {
        Self::with_store(count, page_size, MemoryStore::new())
    }

    #[must_use]
    pub fn with_store(count: usize, page_size: i64, store: MemoryStore) -> Self {
        let catalog = Arc::new(MemoryCatalog::with_products(count));
        let store = Arc::new(store);
        let state = catalog_importer::state::AppState::from_parts(
            Arc::clone(&catalog) as Arc<dyn CatalogSource>,
            Arc::clone(&store) as Arc<dyn LocalStore>,
            page_size,
        );
        Self {
            catalog,
            store,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_product_ids() {
        let product = sample_product(7);
        assert_eq!(product.id.as_str(), "gid://shopify/Product/7");
        assert_eq!(product.price.display(), "19.50 USD");
    }

    #[test]
    fn test_minted_ids_are_distinct() {
        let store = MemoryStore::new();
        let first = store.insert("a");
        let second = store.insert("b");
        assert_ne!(first.id, second.id);
        assert_eq!(first.id.local_id(), "1000");
    }
}
