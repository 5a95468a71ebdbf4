pub mod batch;
pub mod filter;
pub mod url_deriver;

pub use batch::BatchDownloader;
pub use filter::{matches_all, Comparison, Condition};
pub use url_deriver::derive_image_urls;
