//! Domain types decoded from the Shopify APIs.
//!
//! These are the typed records the rest of the crate works with. The
//! generated `graphql_client` types never leave the `shopify` module.

use catalog_importer_core::{Cursor, Price, ShopifyGid};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog Types
// =============================================================================

/// Taxonomy category of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category GID, when the source exposes it.
    pub id: Option<String>,
    /// Display name, e.g. "Hoodies".
    pub name: String,
}

/// One remote product as shown in the catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Fully-qualified product GID.
    pub id: ShopifyGid,
    pub title: String,
    /// Unique slug; the reconciliation key against the local store.
    pub handle: String,
    /// Plain-text description.
    pub description: String,
    /// Featured image URL.
    pub image_url: Option<String>,
    /// Every image URL in API order.
    pub image_urls: Vec<String>,
    /// Minimum variant price.
    pub price: Price,
    pub category: Option<Category>,
    /// Collection titles.
    pub collections: Vec<String>,
    /// Option names, e.g. "Size", "Color".
    pub options: Vec<String>,
    pub variant_count: u64,
}

impl ProductSummary {
    /// Row/selection key: the GID with its resource prefix stripped.
    #[must_use]
    pub fn key(&self) -> &str {
        self.id.local_id()
    }

    /// Distinct image sources to attach on import.
    ///
    /// Falls back to the featured image when the product lists no images.
    #[must_use]
    pub fn media_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::with_capacity(self.image_urls.len().max(1));
        let candidates = if self.image_urls.is_empty() {
            self.image_url.iter().collect::<Vec<_>>()
        } else {
            self.image_urls.iter().collect()
        };
        for url in candidates {
            if !url.is_empty() && !sources.contains(url) {
                sources.push(url.clone());
            }
        }
        sources
    }
}

/// Pagination info for one page of a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Cursor for the first item; absent on an empty page.
    pub start_cursor: Option<Cursor>,
    /// Cursor for the last item; absent on an empty page.
    pub end_cursor: Option<Cursor>,
}

/// One page of remote products, in API order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<ProductSummary>,
    pub page_info: PageInfo,
}

impl ProductPage {
    /// Find an item on this page by handle.
    #[must_use]
    pub fn find_by_handle(&self, handle: &str) -> Option<&ProductSummary> {
        self.products.iter().find(|p| p.handle == handle)
    }
}

// =============================================================================
// Store Types
// =============================================================================

/// Media to attach to a created product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Publicly reachable image URL.
    pub original_source: String,
    pub alt: Option<String>,
}

/// Creation request for the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub handle: String,
    pub description_html: String,
    /// Taxonomy category GID.
    pub category_id: Option<String>,
    pub media: Vec<MediaSource>,
}

/// A product the local store created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedProduct {
    pub id: ShopifyGid,
    pub handle: String,
}
