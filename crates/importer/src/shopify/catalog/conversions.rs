//! Conversions from generated catalog response types to domain types.

use catalog_importer_core::{Cursor, Price, ShopifyGid};

use crate::shopify::ShopifyError;
use crate::shopify::types::{Category, PageInfo, ProductPage, ProductSummary};

use super::queries::get_catalog_page;

/// Convert a `CurrencyCode` enum to its ISO string.
fn currency_code_to_string(code: get_catalog_page::CurrencyCode) -> String {
    match code {
        get_catalog_page::CurrencyCode::Other(code) => code,
        known => format!("{known:?}"),
    }
}

pub fn convert_catalog_page(
    data: get_catalog_page::ResponseData,
) -> Result<ProductPage, ShopifyError> {
    let connection = data.products;

    let products = connection
        .edges
        .into_iter()
        .map(|edge| convert_product(edge.node))
        .collect::<Result<Vec<_>, _>>()?;

    let page_info = connection.page_info;

    Ok(ProductPage {
        products,
        page_info: PageInfo {
            has_previous_page: page_info.has_previous_page,
            has_next_page: page_info.has_next_page,
            start_cursor: page_info.start_cursor.map(Cursor::new),
            end_cursor: page_info.end_cursor.map(Cursor::new),
        },
    })
}

fn convert_product(
    node: get_catalog_page::GetCatalogPageProductsEdgesNode,
) -> Result<ProductSummary, ShopifyError> {
    let id = ShopifyGid::parse(node.id).map_err(|e| ShopifyError::Malformed(e.to_string()))?;

    let min_price = node.price_range.min_variant_price;
    let price = Price::parse(&min_price.amount, currency_code_to_string(min_price.currency_code))
        .map_err(|e| ShopifyError::Malformed(format!("{}: {e}", node.handle)))?;

    let variant_count = node
        .variants_count
        .map_or(0, |c| u64::try_from(c.count).unwrap_or(0));

    Ok(ProductSummary {
        id,
        title: node.title,
        handle: node.handle,
        description: node.description,
        image_url: node.featured_image.map(|img| img.url),
        image_urls: node.images.nodes.into_iter().map(|img| img.url).collect(),
        price,
        category: node.category.map(|c| Category {
            id: c.id,
            name: c.name,
        }),
        collections: node
            .collections
            .edges
            .into_iter()
            .map(|edge| edge.node.title)
            .collect(),
        options: node.options.into_iter().map(|opt| opt.name).collect(),
        variant_count,
    })
}
