pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{decimal_to_sexagesimal, parse_dec, parse_ra, sexagesimal_to_decimal};
pub use filename::{filename_from_url, generate_default_catalog_filename};
pub use progress::ProgressReporter;
