//! Local store (Admin API) client.
//!
//! # Security
//!
//! This client carries the Admin API access token, which can create
//! products in the merchant's store. The token never leaves this module
//! except as a sensitive header value.

mod conversions;
pub mod queries;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::config::ShopifyStoreConfig;
use crate::shopify::ShopifyError;
use crate::shopify::types::{CreatedProduct, NewProduct};

use conversions::{
    convert_created_product, convert_found_product, convert_handle_page, create_variables,
};
use queries::{
    CreateImportedProduct, FindProductByHandle, GetExistingHandles, find_product_by_handle,
    get_existing_handles,
};

/// Handles requested per page when building the handle set.
pub const HANDLE_PAGE_SIZE: i64 = 250;

/// Upper bound on handle pages walked per page view (10,000 products).
pub const MAX_HANDLE_PAGES: usize = 40;

const ADMIN_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-shopify-access-token");

/// Shopify Admin API client for the merchant's own store.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    endpoint: String,
    store: String,
    access_token: HeaderValue,
}

impl StoreClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the access
    /// token is not a valid header value.
    pub fn new(config: &ShopifyStoreConfig, timeout: Duration) -> Result<Self, ShopifyError> {
        let mut access_token = HeaderValue::from_str(config.admin_access_token.expose_secret())
            .map_err(|_| {
                ShopifyError::Unauthorized("admin access token is not a valid header".into())
            })?;
        access_token.set_sensitive(true);

        Ok(Self {
            inner: Arc::new(StoreClientInner {
                client: super::http_client(timeout)?,
                endpoint: config.graphql_endpoint(),
                store: config.store.clone(),
                access_token,
            }),
        })
    }

    fn auth_header(&self) -> (HeaderName, HeaderValue) {
        (ADMIN_TOKEN_HEADER, self.inner.access_token.clone())
    }

    /// Get every product handle in the store.
    ///
    /// Walks `products(first: 250)` pages until the last one, stopping after
    /// [`MAX_HANDLE_PAGES`].
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self), fields(store = %self.inner.store))]
    pub async fn get_existing_handles(&self) -> Result<HashSet<String>, ShopifyError> {
        let mut handles = HashSet::new();
        let mut after: Option<String> = None;

        for page_number in 1..=MAX_HANDLE_PAGES {
            let variables = get_existing_handles::Variables {
                first: HANDLE_PAGE_SIZE,
                after: after.take(),
            };
            let data = super::execute::<GetExistingHandles>(
                &self.inner.client,
                &self.inner.endpoint,
                Some(self.auth_header()),
                variables,
            )
            .await?;

            let page = convert_handle_page(data);
            handles.extend(page.handles);

            match page.next_cursor {
                Some(cursor) if page_number < MAX_HANDLE_PAGES => after = Some(cursor),
                Some(_) => {
                    warn!(
                        pages = MAX_HANDLE_PAGES,
                        "Handle set truncated; import guard still re-checks each handle"
                    );
                    break;
                }
                None => break,
            }
        }

        debug!(count = handles.len(), "Fetched existing handles");
        Ok(handles)
    }

    /// Look up a single product by handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn find_product_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<CreatedProduct>, ShopifyError> {
        let variables = find_product_by_handle::Variables {
            handle: handle.to_string(),
        };

        let data = super::execute::<FindProductByHandle>(
            &self.inner.client,
            &self.inner.endpoint,
            Some(self.auth_header()),
            variables,
        )
        .await?;

        convert_found_product(data)
    }

    /// Create a product with media.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserErrors` if the store rejects the input, or
    /// another variant if the request itself fails.
    #[instrument(skip(self, product), fields(handle = %product.handle, media = product.media.len()))]
    pub async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<CreatedProduct, ShopifyError> {
        let data = super::execute::<CreateImportedProduct>(
            &self.inner.client,
            &self.inner.endpoint,
            Some(self.auth_header()),
            create_variables(product),
        )
        .await?;

        let created = convert_created_product(data)?;
        debug!(product_id = %created.id, "Created product");
        Ok(created)
    }
}
