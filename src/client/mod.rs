pub mod downloader;
pub mod search;

pub use downloader::{ensure_output_dir, FileDownloader};
pub use search::{build_search_url, CatalogClient};
