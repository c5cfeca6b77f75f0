//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is built.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::{FetchError, ImportError};

/// Application-level error type for the importer.
#[derive(Debug, Error)]
pub enum AppError {
    /// A page-view read failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// An import attempt failed.
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Fetch(err) => fetch_status(err),
            Self::Import(err) => match err {
                ImportError::DuplicateHandle(_)
                | ImportError::AlreadyImported { .. }
                | ImportError::InFlight { .. } => StatusCode::CONFLICT,
                ImportError::InvalidMedia(_)
                | ImportError::Validation(_)
                | ImportError::NotOnPage { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ImportError::Fetch(inner) => fetch_status(inner),
                ImportError::Transport(_) => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the operator.
    ///
    /// Upstream bodies are never echoed; store rejections are, since they
    /// describe the operator's own data.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Fetch(err) | Self::Import(ImportError::Fetch(err)) => match err {
                FetchError::UpstreamUnavailable(_) => "Remote catalog unavailable".to_string(),
                FetchError::LocalStoreUnavailable(_) => "Local store unavailable".to_string(),
            },
            Self::Import(ImportError::Transport(_)) => {
                "Local store did not respond; the product may not have been created".to_string()
            }
            Self::Import(err) => err.to_string(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        }
    }

    /// Capture server-side failures to Sentry and the log.
    pub fn report(&self) {
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }
}

const fn fetch_status(err: &FetchError) -> StatusCode {
    match err {
        FetchError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        FetchError::LocalStoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.report();
        (self.status(), self.client_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for operator actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("import", "Import requested", Some(&[("handle", "hoodie")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::ShopifyError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("hoodie".to_string());
        assert_eq!(err.to_string(), "Not found: hoodie");

        let err = AppError::BadRequest("unknown direction".to_string());
        assert_eq!(err.to_string(), "Bad request: unknown direction");
    }

    #[test]
    fn test_fetch_status_codes() {
        assert_eq!(
            get_status(AppError::Fetch(FetchError::UpstreamUnavailable(
                ShopifyError::Malformed("bad".to_string())
            ))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Fetch(FetchError::LocalStoreUnavailable(
                ShopifyError::RateLimited(1)
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_import_status_codes() {
        let conflict = [
            ImportError::DuplicateHandle("taken".to_string()),
            ImportError::AlreadyImported {
                handle: "hoodie".to_string(),
                id: "gid://shopify/Product/1".to_string(),
            },
            ImportError::InFlight {
                handle: "hoodie".to_string(),
            },
        ];
        for err in conflict {
            assert_eq!(get_status(AppError::Import(err)), StatusCode::CONFLICT);
        }

        let unprocessable = [
            ImportError::InvalidMedia("bad url".to_string()),
            ImportError::Validation("blank title".to_string()),
            ImportError::NotOnPage {
                handle: "hoodie".to_string(),
            },
        ];
        for err in unprocessable {
            assert_eq!(
                get_status(AppError::Import(err)),
                StatusCode::UNPROCESSABLE_ENTITY
            );
        }

        assert_eq!(
            get_status(AppError::Import(ImportError::Transport(
                ShopifyError::Unauthorized("nope".to_string())
            ))),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_client_message_hides_upstream_detail() {
        let err = AppError::Fetch(FetchError::UpstreamUnavailable(ShopifyError::Malformed(
            "secret upstream body".to_string(),
        )));
        assert!(!err.client_message().contains("secret"));

        let err = AppError::Internal("stack detail".to_string());
        assert_eq!(err.client_message(), "Internal server error");

        let err = AppError::Import(ImportError::Validation("title: can't be blank".to_string()));
        assert!(err.client_message().contains("can't be blank"));
    }
}
