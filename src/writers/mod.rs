pub mod catalog_writer;

pub use catalog_writer::{write_summary_json, CatalogWriter};
