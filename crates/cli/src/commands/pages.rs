//! Page listing.

use catalog_importer::services::CatalogFetcher;
use catalog_importer::shopify::{PageInfo, ProductSummary};
use catalog_importer_core::{Cursor, Direction, ImportStatus};

use super::CliError;

/// Print `count` pages walking in `direction` from `cursor`.
///
/// Stops early at the end of the catalog.
#[allow(clippy::print_stdout)]
pub async fn list(
    fetcher: &CatalogFetcher,
    mut cursor: Option<Cursor>,
    direction: Direction,
    count: usize,
    json: bool,
) -> Result<(), CliError> {
    for page_number in 1..=count.max(1) {
        let snapshot = fetcher.load(cursor.as_ref(), direction).await?;
        let rows = snapshot.annotated();

        if json {
            let value: Vec<serde_json::Value> = rows
                .iter()
                .map(|(product, status)| {
                    serde_json::json!({ "status": status, "product": product })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "products": value,
                    "pageInfo": snapshot.page.page_info,
                }))?
            );
        } else {
            println!("-- page {page_number} --");
            for (product, status) in &rows {
                println!("{}", format_row(product, *status));
            }
            if rows.is_empty() {
                println!("(no products)");
            }
        }

        match following_cursor(&snapshot.page.page_info, direction) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(())
}

/// Cursor that continues the walk, or `None` at the end of the catalog.
pub fn following_cursor(info: &PageInfo, direction: Direction) -> Option<Cursor> {
    match direction {
        Direction::Forward if info.has_next_page => info.end_cursor.clone(),
        Direction::Backward if info.has_previous_page => info.start_cursor.clone(),
        _ => None,
    }
}

fn format_row(product: &ProductSummary, status: ImportStatus) -> String {
    format!(
        "{:<9}  {:<32}  {:<40}  {:>14}  {} variant(s)",
        status.to_string(),
        product.handle,
        product.title,
        product.price.display(),
        product.variant_count
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalog_importer_core::{Price, ShopifyGid};

    use super::*;

    fn info(has_previous_page: bool, has_next_page: bool) -> PageInfo {
        PageInfo {
            has_previous_page,
            has_next_page,
            start_cursor: Some(Cursor::new("start")),
            end_cursor: Some(Cursor::new("end")),
        }
    }

    #[test]
    fn test_following_cursor_forward() {
        assert_eq!(
            following_cursor(&info(false, true), Direction::Forward),
            Some(Cursor::new("end"))
        );
        assert_eq!(following_cursor(&info(true, false), Direction::Forward), None);
    }

    #[test]
    fn test_following_cursor_backward() {
        assert_eq!(
            following_cursor(&info(true, false), Direction::Backward),
            Some(Cursor::new("start"))
        );
        assert_eq!(following_cursor(&info(false, true), Direction::Backward), None);
    }

    #[test]
    fn test_format_row() {
        let product = ProductSummary {
            id: ShopifyGid::product("7").unwrap(),
            title: "Slides".to_string(),
            handle: "slides".to_string(),
            description: String::new(),
            image_url: None,
            image_urls: vec![],
            price: Price::parse("25", "CAD").unwrap(),
            category: None,
            collections: vec![],
            options: vec![],
            variant_count: 3,
        };
        let row = format_row(&product, ImportStatus::Available);
        assert!(row.contains("slides"));
        assert!(row.contains("25.00 CAD"));
        assert!(row.ends_with("3 variant(s)"));
    }
}
