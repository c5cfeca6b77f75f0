//! End-to-end tests through the HTTP router.
//!
//! Requests go through the full middleware stack via `tower::ServiceExt`;
//! the Shopify APIs are replaced with in-memory doubles.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use catalog_importer::middleware::REQUEST_ID_HEADER;
use catalog_importer::routes;
use catalog_importer_integration_tests::Harness;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(harness: &Harness, request: Request<Body>) -> (StatusCode, Value) {
    let response = routes::app(harness.state.clone())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(harness: &Harness, uri: &str) -> (StatusCode, Value) {
    send(
        harness,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

async fn post_import(harness: &Harness, body: &Value) -> (StatusCode, Value) {
    send(
        harness,
        Request::builder()
            .method("POST")
            .uri("/products/import")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn statuses(view: &Value) -> Vec<String> {
    view["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["status"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_and_request_id() {
    let harness = Harness::new(1, 10);
    let response = routes::app(harness.state.clone())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let harness = Harness::new(1, 10);
    let response = routes::app(harness.state.clone())
        .oneshot(Request::builder().uri("/collections").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Not found: /collections");
}

// =============================================================================
// Catalog View
// =============================================================================

#[tokio::test]
async fn test_first_page_view() {
    let harness = Harness::new(15, 10);
    harness.store.insert("product-0");

    let (status, view) = get(&harness, "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"], "loaded");

    let rows = view["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0]["key"], "0");
    assert_eq!(rows[0]["id"], "gid://shopify/Product/0");
    assert_eq!(rows[0]["price"], "19.50 USD");
    assert_eq!(statuses(&view)[..2], ["imported", "available"]);

    assert!(view["links"]["previous"].is_null());
    assert!(
        view["links"]["next"]
            .as_str()
            .unwrap()
            .ends_with("&direction=next")
    );
}

#[tokio::test]
async fn test_following_next_link() {
    let harness = Harness::new(15, 10);

    let (_, first) = get(&harness, "/products").await;
    let next = first["links"]["next"].as_str().unwrap();
    let (status, second) = get(&harness, &format!("/products{next}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["rows"].as_array().unwrap().len(), 5);
    assert_eq!(second["rows"][0]["handle"], "product-10");
    assert!(second["links"]["next"].is_null());

    let previous = second["links"]["previous"].as_str().unwrap();
    let (_, back) = get(&harness, &format!("/products{previous}")).await;
    assert_eq!(back["rows"], first["rows"]);
}

#[tokio::test]
async fn test_unknown_direction_is_bad_request() {
    let harness = Harness::new(5, 10);
    let (status, _) = get(&harness, "/products?direction=sideways").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_outage_is_bad_gateway() {
    let harness = Harness::new(5, 10);
    harness.catalog.set_unavailable(true);

    let (status, _) = get(&harness, "/products").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

// =============================================================================
// Import Flow
// =============================================================================

#[tokio::test]
async fn test_import_then_refetch_shows_imported() {
    let harness = Harness::new(5, 10);

    let (_, before) = get(&harness, "/products").await;
    assert_eq!(statuses(&before)[2], "available");

    let (status, outcome) = post_import(&harness, &json!({ "handle": "product-2" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(outcome["state"], "import_succeeded");
    assert_eq!(outcome["refetch"], true);
    assert_eq!(outcome["product"]["handle"], "product-2");

    let (_, after) = get(&harness, "/products").await;
    assert_eq!(statuses(&after)[2], "imported");
}

#[tokio::test]
async fn test_repeat_import_is_conflict() {
    let harness = Harness::new(5, 10);
    let command = json!({ "handle": "product-1", "direction": "next" });

    let (status, _) = post_import(&harness, &command).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, outcome) = post_import(&harness, &command).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(outcome["state"], "import_failed");
    assert_eq!(outcome["refetch"], false);
    assert!(outcome["error"].as_str().unwrap().contains("already imported"));
    assert_eq!(harness.store.create_calls(), 1);
}

#[tokio::test]
async fn test_import_off_page_is_unprocessable() {
    let harness = Harness::new(25, 10);
    let (status, outcome) = post_import(&harness, &json!({ "handle": "product-20" })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(outcome["product"].is_null());
    assert_eq!(harness.store.create_calls(), 0);
}

#[tokio::test]
async fn test_store_outage_during_import_is_bad_gateway() {
    let harness = Harness::new(5, 10);
    let (_, view) = get(&harness, "/products").await;
    assert_eq!(view["state"], "loaded");

    harness.store.set_unavailable(true);
    let (status, outcome) = post_import(&harness, &json!({ "handle": "product-1" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(outcome["state"], "import_failed");
    assert!(!outcome["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_page_through_and_import_from_second_page() {
    let harness = Harness::new(15, 10);

    let (_, first) = get(&harness, "/products").await;
    assert_eq!(first["page_info"]["has_previous_page"], false);

    let next = first["links"]["next"].as_str().unwrap().to_string();
    let (_, second) = get(&harness, &format!("/products{next}")).await;
    assert_eq!(second["page_info"]["has_previous_page"], true);
    assert_eq!(second["rows"][3]["status"], "available");

    let cursor = first["page_info"]["end_cursor"].clone();
    let (status, _) = post_import(
        &harness,
        &json!({ "cursor": cursor, "direction": "next", "handle": "product-13" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(harness.store.handles().contains("product-13"));

    let (_, refreshed) = get(&harness, &format!("/products{next}")).await;
    assert_eq!(refreshed["rows"][3]["handle"], "product-13");
    assert_eq!(refreshed["rows"][3]["status"], "imported");
}
