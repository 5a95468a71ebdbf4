use crate::utils::constants::DEFAULT_OUTPUT_DIR;
use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Generate default catalog filename with format: ptf-catalog-{YYMMDD}.csv
pub fn generate_default_catalog_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!("ptf-catalog-{:02}{:02}{:02}.csv", year, month, day);
    PathBuf::from(DEFAULT_OUTPUT_DIR).join(filename)
}

/// Local filename for a download: everything after the final `/` of the URL
pub fn filename_from_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(pos) => &url[pos + 1..],
        None => url,
    }
}
