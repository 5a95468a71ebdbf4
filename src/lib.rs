pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use client::{CatalogClient, FileDownloader};
pub use config::ClientConfig;
pub use error::{PtfError, Result};
pub use processors::BatchDownloader;
