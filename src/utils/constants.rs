/// IRSA endpoints for PTF level-1 images
pub const DEFAULT_SEARCH_BASE_URL: &str =
    "http://irsa.ipac.caltech.edu/ibe/search/ptf/images/level1?POS=";
pub const DEFAULT_IMAGE_BASE_URL: &str = "http://irsa.ipac.caltech.edu/ibe/data/ptf/images/level1/";

/// Request timeout applied to every HTTP call (0 disables it)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "PTF";

/// Catalog column names
pub const COLUMN_ANCILLARY_FILENAME: &str = "afilename1";
pub const COLUMN_PROCESSED_FILENAME: &str = "pfilename";

/// Catalog text layout
pub const HEADER_DELIMITER: char = '|';
pub const DIRECTIVE_MARKER: char = '\\';
pub const HEADER_LINE_COUNT: usize = 3;
pub const MIN_DATA_TOKENS: usize = 7;

/// Output defaults
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
