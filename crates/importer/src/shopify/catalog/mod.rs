//! Remote catalog (Storefront API) client.
//!
//! Read-only. Pages are fetched fresh on every call; cursors are replayed
//! exactly as the API issued them.

mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use catalog_importer_core::{Cursor, Direction};
use reqwest::header::{HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::CatalogConfig;
use crate::shopify::ShopifyError;
use crate::shopify::types::ProductPage;

use conversions::convert_catalog_page;
use queries::{GetCatalogPage, get_catalog_page};

/// Collections listed per product.
const COLLECTION_COUNT: i64 = 5;
/// Options listed per product.
const OPTION_COUNT: i64 = 5;
/// Images fetched per product (these become import media).
const IMAGE_COUNT: i64 = 10;

const STOREFRONT_TOKEN_HEADER: HeaderName =
    HeaderName::from_static("x-shopify-storefront-access-token");

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote product catalog.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<HeaderValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the access
    /// token is not a valid header value.
    pub fn new(config: &CatalogConfig, timeout: Duration) -> Result<Self, ShopifyError> {
        let access_token = config
            .access_token
            .as_ref()
            .map(|token| {
                let mut value = HeaderValue::from_str(token.expose_secret()).map_err(|_| {
                    ShopifyError::Unauthorized("catalog access token is not a valid header".into())
                })?;
                value.set_sensitive(true);
                Ok::<_, ShopifyError>(value)
            })
            .transpose()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: super::http_client(timeout)?,
                endpoint: config.endpoint.clone(),
                access_token,
            }),
        })
    }

    /// Get one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is malformed.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn get_page(
        &self,
        cursor: Option<&Cursor>,
        direction: Direction,
        page_size: i64,
    ) -> Result<ProductPage, ShopifyError> {
        let variables = page_variables(cursor, direction, page_size);

        let data = super::execute::<GetCatalogPage>(
            &self.inner.client,
            &self.inner.endpoint,
            self.inner
                .access_token
                .clone()
                .map(|value| (STOREFRONT_TOKEN_HEADER, value)),
            variables,
        )
        .await?;

        let page = convert_catalog_page(data)?;
        debug!(count = page.products.len(), "Fetched catalog page");
        Ok(page)
    }
}

/// Map a cursor and direction onto `first/after` or `last/before`.
///
/// Paging backward without a cursor has no anchor, so it reads the first page.
fn page_variables(
    cursor: Option<&Cursor>,
    direction: Direction,
    page_size: i64,
) -> get_catalog_page::Variables {
    let token = cursor.map(|c| c.as_str().to_string());
    let (first, last, after, before) = match (direction, token) {
        (Direction::Backward, Some(before)) => (None, Some(page_size), None, Some(before)),
        (Direction::Forward, after) => (Some(page_size), None, after, None),
        (Direction::Backward, None) => (Some(page_size), None, None, None),
    };

    get_catalog_page::Variables {
        first,
        last,
        after,
        before,
        collection_count: Some(COLLECTION_COUNT),
        option_count: Some(OPTION_COUNT),
        image_count: Some(IMAGE_COUNT),
    }
}
