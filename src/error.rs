use thiserror::Error;

pub type Result<T> = std::result::Result<T, PtfError>;

#[derive(Error, Debug)]
pub enum PtfError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search service at {url} returned status {status}")]
    RemoteService { status: u16, url: String },

    #[error("Catalog parse error: {0}")]
    Parse(String),

    #[error("Column '{column}' not found in catalog")]
    ColumnNotFound { column: String },

    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    #[error("Filesystem error at {path}: {message}")]
    Filesystem { path: String, message: String },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid coordinate format: {0}")]
    InvalidCoordinate(String),
}

impl PtfError {
    pub(crate) fn filesystem(path: &std::path::Path, message: impl Into<String>) -> Self {
        PtfError::Filesystem {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Short label used in logs and download summaries
    pub fn category(&self) -> &'static str {
        match self {
            PtfError::Io(_) | PtfError::Filesystem { .. } => "filesystem",
            PtfError::Http(_) | PtfError::RemoteService { .. } => "remote",
            PtfError::Parse(_) | PtfError::ColumnNotFound { .. } => "catalog",
            PtfError::Download { .. } => "download",
            PtfError::Csv(_) | PtfError::Json(_) => "output",
            PtfError::Config(_) | PtfError::Validation(_) => "configuration",
            PtfError::InvalidFilter(_) | PtfError::InvalidCoordinate(_) => "input",
        }
    }
}
