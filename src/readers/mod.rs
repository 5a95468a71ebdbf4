pub mod catalog_reader;

pub use catalog_reader::{CatalogReader, TokenMerge, PTF_TOKEN_MERGES};
