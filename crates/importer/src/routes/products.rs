//! Catalog page and import handlers.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use catalog_importer_core::{Cursor, Direction, ImportStatus, ViewEvent, ViewState};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{CatalogSnapshot, ImportCommand, description};
use crate::shopify::{CreatedProduct, PageInfo, ProductSummary};
use crate::state::AppState;

/// Page navigation query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<String>,
    pub direction: Option<String>,
}

impl PageQuery {
    /// Split into a cursor and a direction. An empty cursor means the first page.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown direction.
    pub fn into_parts(self) -> Result<(Option<Cursor>, Direction)> {
        let direction = match self.direction.as_deref() {
            None | Some("") => Direction::default(),
            Some(value) => value
                .parse::<Direction>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        };
        Ok((Cursor::from_param(self.cursor), direction))
    }
}

/// One table row.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    /// Stripped id, for row keys and selection only.
    pub key: String,
    /// Fully-qualified id.
    pub id: String,
    pub title: String,
    pub handle: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub price: String,
    pub category: Option<String>,
    pub collections: Vec<String>,
    pub options: Vec<String>,
    pub variant_count: u64,
    pub status: ImportStatus,
}

impl ProductRow {
    fn new(product: &ProductSummary, status: ImportStatus) -> Self {
        Self {
            key: product.key().to_string(),
            id: product.id.to_string(),
            title: product.title.clone(),
            handle: product.handle.clone(),
            excerpt: description::excerpt(&product.description),
            image_url: product.image_url.clone(),
            price: product.price.display(),
            category: product.category.as_ref().map(|c| c.name.clone()),
            collections: product.collections.clone(),
            options: product.options.clone(),
            variant_count: product.variant_count,
            status,
        }
    }
}

/// Previous/next navigation links.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageLinks {
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl PageLinks {
    fn from_page_info(info: &PageInfo) -> Self {
        let link = |cursor: &Cursor, direction: Direction| {
            format!(
                "?cursor={}&direction={}",
                urlencoding::encode(cursor.as_str()),
                direction.as_param()
            )
        };

        Self {
            previous: info
                .start_cursor
                .as_ref()
                .filter(|_| info.has_previous_page)
                .map(|c| link(c, Direction::Backward)),
            next: info
                .end_cursor
                .as_ref()
                .filter(|_| info.has_next_page)
                .map(|c| link(c, Direction::Forward)),
        }
    }
}

/// Catalog page as rendered by the embedded admin UI.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub rows: Vec<ProductRow>,
    pub page_info: PageInfo,
    pub state: ViewState,
    pub links: PageLinks,
}

impl CatalogView {
    fn new(snapshot: &CatalogSnapshot, state: ViewState) -> Self {
        Self {
            rows: snapshot
                .annotated()
                .into_iter()
                .map(|(product, status)| ProductRow::new(product, status))
                .collect(),
            page_info: snapshot.page.page_info.clone(),
            state,
            links: PageLinks::from_page_info(&snapshot.page.page_info),
        }
    }
}

/// Result of an import request.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub state: ViewState,
    /// Whether the client should reload the page to see the new status.
    pub refetch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<CreatedProduct>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn advance(state: ViewState, event: ViewEvent) -> Result<ViewState> {
    state
        .apply(event)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Show one catalog page with import status per row.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CatalogView>> {
    let (cursor, direction) = query.into_parts()?;
    let view_state = advance(ViewState::Idle, ViewEvent::FetchStarted)?;

    let snapshot = state.fetcher().load(cursor.as_ref(), direction).await?;
    let view_state = advance(view_state, ViewEvent::FetchSucceeded)?;

    Ok(Json(CatalogView::new(&snapshot, view_state)))
}

/// Import one product from a catalog page.
///
/// Rejections are returned as an `ImportOutcome` with an error status so the
/// UI can show the message inline next to the row.
#[instrument(skip(state, command), fields(handle = %command.handle))]
pub async fn import(
    State(state): State<AppState>,
    Json(command): Json<ImportCommand>,
) -> Result<impl IntoResponse> {
    add_breadcrumb(
        "import",
        "Import requested",
        Some(&[("handle", command.handle.as_str())]),
    );
    let importing = advance(ViewState::Loaded, ViewEvent::ImportRequested)?;

    match state
        .reconciler()
        .import_command(state.fetcher(), &command)
        .await
    {
        Ok(product) => {
            info!(product_id = %product.id, "Import succeeded");
            let done = advance(importing, ViewEvent::ImportSucceeded)?;
            Ok((
                StatusCode::CREATED,
                Json(ImportOutcome {
                    state: done,
                    refetch: done.needs_refetch(),
                    product: Some(product),
                    error: None,
                }),
            ))
        }
        Err(err) => {
            let err = AppError::Import(err);
            err.report();
            let failed = advance(importing, ViewEvent::ImportFailed)?;
            Ok((
                err.status(),
                Json(ImportOutcome {
                    state: failed,
                    refetch: failed.needs_refetch(),
                    product: None,
                    error: Some(err.client_message()),
                }),
            ))
        }
    }
}
