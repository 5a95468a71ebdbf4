use crate::error::Result;
use crate::models::{CatalogTable, ImageKind, ImageUrls, RowPredicate};
use tracing::debug;

/// Map selected rows to download URLs.
///
/// Both filename columns must exist even when no row is selected. Values are
/// appended to `image_base_url` verbatim.
pub fn derive_image_urls(
    table: &CatalogTable,
    image_base_url: &str,
    predicate: Option<&RowPredicate<'_>>,
) -> Result<ImageUrls> {
    let ancillary_column = table.require_column(ImageKind::Ancillary.column())?;
    let processed_column = table.require_column(ImageKind::Processed.column())?;

    let selected: Vec<usize> = table
        .rows()
        .filter(|row| predicate.map_or(true, |p| p(row)))
        .map(|row| row.index())
        .collect();

    let join = |values: &[String]| -> Vec<String> {
        selected
            .iter()
            .map(|&i| format!("{}{}", image_base_url, values[i]))
            .collect()
    };

    let urls = ImageUrls {
        ancillary: join(ancillary_column.raw_values()),
        processed: join(processed_column.raw_values()),
    };

    debug!(
        total_rows = table.num_rows(),
        selected_rows = urls.len(),
        "Derived image URLs"
    );
    Ok(urls)
}
