//! Import reconciliation.
//!
//! The read half ([`annotate`]) marks each page item `Imported` or
//! `Available` against the local handle set. The write half
//! ([`Reconciler::import_product`]) creates one remote item in the local
//! store.
//!
//! The handle set is read at page-load time and the import happens later,
//! so the set can be stale. Two guards close that window:
//!
//! 1. an in-flight set keyed by handle rejects a second import of the same
//!    handle while the first is still outstanding;
//! 2. the store is asked for the handle again immediately before creation.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use catalog_importer_core::{Cursor, Direction, ImportStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::shopify::{
    CreatedProduct, MediaSource, NewProduct, ProductPage, ProductSummary, ShopifyError, UserError,
};

use super::{CatalogFetcher, FetchError, LocalStore, description};

/// Pair every page item with its import status, preserving page order.
#[must_use]
pub fn annotate<'a>(
    page: &'a ProductPage,
    existing: &HashSet<String>,
) -> Vec<(&'a ProductSummary, ImportStatus)> {
    page.products
        .iter()
        .map(|product| (product, ImportStatus::for_handle(&product.handle, existing)))
        .collect()
}

/// Why an import did not create a product.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The store already has a product with this handle.
    #[error("handle already taken: {0}")]
    DuplicateHandle(String),

    /// The store rejected one of the image sources.
    #[error("invalid media: {0}")]
    InvalidMedia(String),

    /// The store rejected the product input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The re-check found the handle already present.
    #[error("{handle} is already imported as {id}")]
    AlreadyImported { handle: String, id: String },

    /// Another import of this handle has not finished yet.
    #[error("an import of {handle} is already in progress")]
    InFlight { handle: String },

    /// The requested handle is not on the referenced catalog page.
    #[error("{handle} is not on the requested catalog page")]
    NotOnPage { handle: String },

    /// The catalog page could not be re-read.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The request never produced a verdict from the store.
    #[error("store request failed: {0}")]
    Transport(#[source] ShopifyError),
}

impl ImportError {
    /// Whether the store itself refused the product.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateHandle(_) | Self::InvalidMedia(_) | Self::Validation(_)
        )
    }

    /// Map a store error from `productCreate` onto an import error.
    fn from_create_error(error: ShopifyError) -> Self {
        match error {
            ShopifyError::UserErrors(errors) => classify_user_errors(&errors),
            other => Self::Transport(other),
        }
    }
}

/// Classify `productCreate` user errors into a single cause.
///
/// Only a "taken" error on the `handle` field is a duplicate; media errors are
/// recognised by field path. Everything else is a validation failure.
fn classify_user_errors(errors: &[UserError]) -> ImportError {
    let message = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    if errors.iter().any(is_handle_taken) {
        ImportError::DuplicateHandle(message)
    } else if errors.iter().any(is_media_error) {
        ImportError::InvalidMedia(message)
    } else {
        ImportError::Validation(message)
    }
}

fn is_handle_taken(error: &UserError) -> bool {
    let on_handle = error
        .field
        .last()
        .is_some_and(|f| f.eq_ignore_ascii_case("handle"));
    let message = error.message.to_lowercase();
    on_handle && (message.contains("taken") || message.contains("already"))
}

fn is_media_error(error: &UserError) -> bool {
    error.field.first().is_some_and(|f| f.eq_ignore_ascii_case("media"))
        || error
            .field
            .iter()
            .any(|f| f.eq_ignore_ascii_case("originalSource"))
}

/// Operator request to import one item from a catalog page.
///
/// Only the page coordinates and the handle travel from the client; product
/// data is re-read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCommand {
    /// Cursor of the page the operator was looking at; absent for the first page.
    #[serde(default)]
    pub cursor: Option<Cursor>,
    #[serde(default)]
    pub direction: Direction,
    pub handle: String,
}

/// Build the store creation request for a remote product.
#[must_use]
pub fn new_product_from(product: &ProductSummary) -> NewProduct {
    NewProduct {
        title: product.title.clone(),
        handle: product.handle.clone(),
        description_html: description::to_html(&product.description),
        category_id: product.category.as_ref().and_then(|c| c.id.clone()),
        media: product
            .media_sources()
            .into_iter()
            .map(|url| MediaSource {
                original_source: url,
                alt: Some(product.title.clone()),
            })
            .collect(),
    }
}

type InFlightSet = Arc<Mutex<HashSet<String>>>;

/// Marks a handle as being imported until dropped.
struct InFlightGuard {
    set: InFlightSet,
    handle: String,
}

impl InFlightGuard {
    fn acquire(set: &InFlightSet, handle: &str) -> Result<Self, ImportError> {
        let inserted = set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle.to_string());
        if !inserted {
            return Err(ImportError::InFlight {
                handle: handle.to_string(),
            });
        }
        Ok(Self {
            set: Arc::clone(set),
            handle: handle.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.handle);
    }
}

/// Performs guarded imports into the local store.
///
/// Cheap to clone; clones share the in-flight set.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn LocalStore>,
    in_flight: InFlightSet,
}

impl Reconciler {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self {
            store,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Import one remote product.
    ///
    /// # Errors
    ///
    /// - `InFlight` if the same handle is being imported concurrently
    /// - `AlreadyImported` if the store already has the handle
    /// - `DuplicateHandle`, `InvalidMedia`, `Validation` if the store rejects it
    /// - `Transport` if a store request fails without a verdict
    #[instrument(skip(self, product), fields(handle = %product.handle, product_id = %product.id))]
    pub async fn import_product(
        &self,
        product: &ProductSummary,
    ) -> Result<CreatedProduct, ImportError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, &product.handle)?;

        if let Some(existing) = self
            .store
            .find_by_handle(&product.handle)
            .await
            .map_err(ImportError::Transport)?
        {
            warn!(existing_id = %existing.id, "Handle already present in store");
            return Err(ImportError::AlreadyImported {
                handle: existing.handle,
                id: existing.id.to_string(),
            });
        }

        let created = self
            .store
            .create_product(&new_product_from(product))
            .await
            .map_err(ImportError::from_create_error)?;

        info!(created_id = %created.id, "Imported product");
        Ok(created)
    }

    /// Re-read the referenced catalog page and import the item with the
    /// command's handle.
    ///
    /// # Errors
    ///
    /// Returns `Fetch` if the page cannot be read, `NotOnPage` if the handle
    /// is not on it, or any error from [`Self::import_product`].
    #[instrument(skip(self, fetcher), fields(handle = %command.handle))]
    pub async fn import_command(
        &self,
        fetcher: &CatalogFetcher,
        command: &ImportCommand,
    ) -> Result<CreatedProduct, ImportError> {
        let page = fetcher
            .fetch_page(command.cursor.as_ref(), command.direction)
            .await?;

        let product = page
            .find_by_handle(&command.handle)
            .ok_or_else(|| ImportError::NotOnPage {
                handle: command.handle.clone(),
            })?;

        self.import_product(product).await
    }
}
