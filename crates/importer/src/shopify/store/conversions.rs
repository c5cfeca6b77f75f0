//! Conversions between domain types and generated store types.

use catalog_importer_core::ShopifyGid;

use crate::shopify::types::{CreatedProduct, NewProduct};
use crate::shopify::{ShopifyError, UserError};

use super::queries::{create_imported_product, find_product_by_handle, get_existing_handles};

/// One page of local handles plus the cursor to continue from.
#[derive(Debug, Default)]
pub struct HandlePage {
    pub handles: Vec<String>,
    pub next_cursor: Option<String>,
}

pub fn convert_handle_page(data: get_existing_handles::ResponseData) -> HandlePage {
    let connection = data.products;
    let next_cursor = if connection.page_info.has_next_page {
        connection.page_info.end_cursor
    } else {
        None
    };

    HandlePage {
        handles: connection
            .edges
            .into_iter()
            .map(|edge| edge.node.handle)
            .collect(),
        next_cursor,
    }
}

pub fn convert_found_product(
    data: find_product_by_handle::ResponseData,
) -> Result<Option<CreatedProduct>, ShopifyError> {
    data.product_by_identifier
        .map(|product| {
            Ok(CreatedProduct {
                id: ShopifyGid::parse(product.id)
                    .map_err(|e| ShopifyError::Malformed(e.to_string()))?,
                handle: product.handle,
            })
        })
        .transpose()
}

/// Build `productCreate` variables. Imports land as drafts.
pub fn create_variables(product: &NewProduct) -> create_imported_product::Variables {
    use create_imported_product::{CreateMediaInput, MediaContentType, ProductCreateInput, ProductStatus, Variables};

    let media: Vec<CreateMediaInput> = product
        .media
        .iter()
        .map(|m| CreateMediaInput {
            original_source: m.original_source.clone(),
            media_content_type: MediaContentType::IMAGE,
            alt: m.alt.clone(),
        })
        .collect();

    Variables {
        product: ProductCreateInput {
            title: Some(product.title.clone()),
            handle: Some(product.handle.clone()),
            description_html: Some(product.description_html.clone()),
            category: product.category_id.clone(),
            status: Some(ProductStatus::DRAFT),
        },
        media: if media.is_empty() { None } else { Some(media) },
    }
}

pub fn convert_created_product(
    data: create_imported_product::ResponseData,
) -> Result<CreatedProduct, ShopifyError> {
    let Some(payload) = data.product_create else {
        return Err(ShopifyError::Malformed(
            "productCreate returned no payload".to_string(),
        ));
    };

    if !payload.user_errors.is_empty() {
        return Err(ShopifyError::UserErrors(
            payload
                .user_errors
                .into_iter()
                .map(|e| UserError {
                    field: e.field.unwrap_or_default(),
                    message: e.message,
                })
                .collect(),
        ));
    }

    let product = payload.product.ok_or_else(|| {
        ShopifyError::Malformed("No product returned from create".to_string())
    })?;

    Ok(CreatedProduct {
        id: ShopifyGid::parse(product.id).map_err(|e| ShopifyError::Malformed(e.to_string()))?,
        handle: product.handle,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::shopify::types::MediaSource;

    #[test]
    fn test_handle_page_with_more() {
        let data: get_existing_handles::ResponseData = serde_json::from_value(json!({
            "products": {
                "edges": [ { "node": { "handle": "hoodie" } }, { "node": { "handle": "slides" } } ],
                "pageInfo": { "hasNextPage": true, "endCursor": "next-token" }
            }
        }))
        .unwrap();

        let page = convert_handle_page(data);
        assert_eq!(page.handles, vec!["hoodie", "slides"]);
        assert_eq!(page.next_cursor.as_deref(), Some("next-token"));
    }

    #[test]
    fn test_handle_page_last() {
        let data: get_existing_handles::ResponseData = serde_json::from_value(json!({
            "products": {
                "edges": [],
                "pageInfo": { "hasNextPage": false, "endCursor": "ignored" }
            }
        }))
        .unwrap();

        let page = convert_handle_page(data);
        assert!(page.handles.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_found_and_missing_product() {
        let found: find_product_by_handle::ResponseData = serde_json::from_value(json!({
            "productByIdentifier": { "id": "gid://shopify/Product/5", "handle": "hoodie" }
        }))
        .unwrap();
        let product = convert_found_product(found).unwrap().unwrap();
        assert_eq!(product.id.local_id(), "5");

        let missing: find_product_by_handle::ResponseData =
            serde_json::from_value(json!({ "productByIdentifier": null })).unwrap();
        assert!(convert_found_product(missing).unwrap().is_none());
    }

    #[test]
    fn test_create_variables_serialize() {
        let product = NewProduct {
            title: "Hoodie".to_string(),
            handle: "hoodie".to_string(),
            description_html: "<p>Warm.</p>".to_string(),
            category_id: Some("gid://shopify/TaxonomyCategory/aa-1-13-13".to_string()),
            media: vec![MediaSource {
                original_source: "https://cdn.shopify.com/hoodie.jpg".to_string(),
                alt: Some("Hoodie".to_string()),
            }],
        };

        let value = serde_json::to_value(create_variables(&product)).unwrap();
        assert_eq!(value["product"]["title"], "Hoodie");
        assert_eq!(value["product"]["handle"], "hoodie");
        assert_eq!(value["product"]["descriptionHtml"], "<p>Warm.</p>");
        assert_eq!(
            value["product"]["category"],
            "gid://shopify/TaxonomyCategory/aa-1-13-13"
        );
        assert_eq!(value["product"]["status"], "DRAFT");
        assert_eq!(value["media"][0]["mediaContentType"], "IMAGE");
        assert_eq!(
            value["media"][0]["originalSource"],
            "https://cdn.shopify.com/hoodie.jpg"
        );
    }

    #[test]
    fn test_create_variables_without_media() {
        let product = NewProduct {
            title: "Hoodie".to_string(),
            handle: "hoodie".to_string(),
            description_html: String::new(),
            category_id: None,
            media: vec![],
        };
        assert!(create_variables(&product).media.is_none());
    }

    #[test]
    fn test_created_product() {
        let data: create_imported_product::ResponseData = serde_json::from_value(json!({
            "productCreate": {
                "product": { "id": "gid://shopify/Product/99", "handle": "hoodie" },
                "userErrors": []
            }
        }))
        .unwrap();
        let created = convert_created_product(data).unwrap();
        assert_eq!(created.id.as_str(), "gid://shopify/Product/99");
        assert_eq!(created.handle, "hoodie");
    }

    #[test]
    fn test_created_product_user_errors() {
        let data: create_imported_product::ResponseData = serde_json::from_value(json!({
            "productCreate": {
                "product": null,
                "userErrors": [ { "field": ["handle"], "message": "Handle has already been taken" } ]
            }
        }))
        .unwrap();
        match convert_created_product(data) {
            Err(ShopifyError::UserErrors(errors)) => {
                assert_eq!(errors[0].field, vec!["handle"]);
            }
            other => panic!("expected user errors, got {other:?}"),
        }
    }
}
