pub mod catalog;
pub mod coordinate;
pub mod image;

pub use catalog::{
    classify_column, CatalogHeader, CatalogTable, Cell, Column, ColumnType, ParsedCatalog,
    RowPredicate, RowView,
};
pub use coordinate::Coordinate;
pub use image::{DownloadOutcome, DownloadResult, ImageKind, ImageUrls};
