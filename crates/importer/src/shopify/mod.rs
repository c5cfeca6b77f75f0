//! Shopify GraphQL clients for the remote catalog and the local store.
//!
//! # Architecture
//!
//! - Uses `graphql-client` crate for type-safe GraphQL queries, generated
//!   from the schema subsets under `graphql/`
//! - HTTP via `reqwest` 0.13 directly
//! - Responses are decoded into typed records once, at this boundary
//! - No caching: every page view reads both sources fresh
//!
//! # APIs
//!
//! ## Catalog (Storefront API)
//! - Remote, read-only product pages (`products(first|last, after|before)`)
//! - Defaults to the public demo storefront, which needs no token
//!
//! ## Store (Admin API)
//! - Existing product handles, single-handle lookup, `productCreate`
//! - Authenticated with a static Admin API access token
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_importer::shopify::{CatalogClient, StoreClient};
//!
//! let catalog = CatalogClient::new(&config.catalog, config.http_timeout)?;
//! let page = catalog.get_page(None, Direction::Forward, 10).await?;
//!
//! let store = StoreClient::new(&config.store, config.http_timeout)?;
//! let handles = store.get_existing_handles().await?;
//! ```

mod catalog;
mod store;
pub mod types;

pub use catalog::CatalogClient;
pub use store::StoreClient;
pub use types::*;

use graphql_client::{GraphQLQuery, Response};
use reqwest::header::{HeaderName, HeaderValue};
use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response decoded but violated the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Mutation rejected with user errors (e.g., invalid input).
    #[error("User errors: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),
}

/// A GraphQL error returned by a Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A `userErrors` entry from a mutation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// Path to the offending input field, e.g. `["handle"]`.
    pub field: Vec<String>,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field.join("."), self.message)
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build the shared HTTP client with the configured timeout.
fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, ShopifyError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()?)
}

/// POST a GraphQL operation and decode its data.
///
/// `auth` is the optional access-token header for the target API.
async fn execute<Q: GraphQLQuery>(
    client: &reqwest::Client,
    endpoint: &str,
    auth: Option<(HeaderName, HeaderValue)>,
    variables: Q::Variables,
) -> Result<Q::ResponseData, ShopifyError> {
    let request_body = Q::build_query(variables);

    let mut request = client
        .post(endpoint)
        .header("Content-Type", "application/json")
        .json(&request_body);
    if let Some((name, value)) = auth {
        request = request.header(name, value);
    }

    let response = request.send().await?;
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ShopifyError::RateLimited(retry_after));
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(ShopifyError::Unauthorized(format!(
            "HTTP {status}: invalid or expired access token"
        )));
    }

    // Get response body as text first for better error diagnostics
    let response_text = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %response_text.chars().take(500).collect::<String>(),
            "Shopify API returned non-success status"
        );
        return Err(ShopifyError::GraphQL(vec![GraphQLError::message(format!(
            "HTTP {status}: {}",
            response_text.chars().take(200).collect::<String>()
        ))]));
    }

    decode_response::<Q::ResponseData>(&response_text)
}

/// Decode a GraphQL response body, surfacing `errors` before `data`.
fn decode_response<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ShopifyError> {
    let response: Response<T> = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Shopify GraphQL response"
            );
            return Err(ShopifyError::Parse(e));
        }
    };

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        tracing::debug!(errors = ?errors, "GraphQL errors in response");

        return Err(ShopifyError::GraphQL(
            errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e.locations.map_or_else(Vec::new, |locs| {
                        locs.into_iter()
                            .map(|l| GraphQLErrorLocation {
                                line: i64::from(l.line),
                                column: i64::from(l.column),
                            })
                            .collect()
                    }),
                    path: e.path.map_or_else(Vec::new, |p| {
                        p.into_iter()
                            .map(|fragment| match fragment {
                                graphql_client::PathFragment::Key(s) => {
                                    serde_json::Value::String(s)
                                }
                                graphql_client::PathFragment::Index(i) => {
                                    serde_json::Value::Number(i.into())
                                }
                            })
                            .collect()
                    }),
                })
                .collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            body = %body.chars().take(500).collect::<String>(),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::GraphQL(vec![GraphQLError::message("No data in response")])
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Data {
        ok: bool,
    }

    #[test]
    fn test_decode_response_data() {
        let data: Data = decode_response(r#"{"data":{"ok":true}}"#).unwrap();
        assert!(data.ok);
    }

    #[test]
    fn test_decode_response_errors_win() {
        let err = decode_response::<Data>(
            r#"{"data":null,"errors":[{"message":"Throttled","locations":[{"line":2,"column":3}],"path":["products",0]}]}"#,
        )
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Throttled"));
        assert!(text.contains("path: products.0"));
        assert!(text.contains("at line 2:3"));
    }

    #[test]
    fn test_decode_response_no_data() {
        let err = decode_response::<Data>(r#"{"data":null}"#).unwrap_err();
        assert!(err.to_string().contains("No data in response"));
    }

    #[test]
    fn test_decode_response_garbage() {
        assert!(matches!(
            decode_response::<Data>("<html>502</html>"),
            Err(ShopifyError::Parse(_))
        ));
    }

    #[test]
    fn test_user_error_display() {
        let err = ShopifyError::UserErrors(vec![
            UserError {
                field: vec!["product".to_string(), "handle".to_string()],
                message: "Handle has already been taken".to_string(),
            },
            UserError {
                field: vec![],
                message: "Something else".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "User errors: product.handle: Handle has already been taken; Something else"
        );
    }

    #[test]
    fn test_format_graphql_errors_empty() {
        assert_eq!(format_graphql_errors(&[]), "(no error details provided)");
    }
}
