use crate::utils::constants::{COLUMN_ANCILLARY_FILENAME, COLUMN_PROCESSED_FILENAME};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The two image files listed for every catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// `afilename1`
    Ancillary,
    /// `pfilename`
    Processed,
}

impl ImageKind {
    pub fn column(&self) -> &'static str {
        match self {
            ImageKind::Ancillary => COLUMN_ANCILLARY_FILENAME,
            ImageKind::Processed => COLUMN_PROCESSED_FILENAME,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Ancillary => write!(f, "ancillary"),
            ImageKind::Processed => write!(f, "processed"),
        }
    }
}

/// Parallel URL lists, one entry per selected row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub ancillary: Vec<String>,
    pub processed: Vec<String>,
}

impl ImageUrls {
    pub fn len(&self) -> usize {
        self.ancillary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ancillary.is_empty()
    }

    /// Every ancillary URL in row order, then every processed URL
    pub fn download_order(&self) -> impl Iterator<Item = (ImageKind, &str)> + '_ {
        self.ancillary
            .iter()
            .map(|u| (ImageKind::Ancillary, u.as_str()))
            .chain(
                self.processed
                    .iter()
                    .map(|u| (ImageKind::Processed, u.as_str())),
            )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DownloadOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    Failed { category: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub url: String,
    pub kind: ImageKind,
    #[serde(flatten)]
    pub outcome: DownloadOutcome,
}

impl DownloadResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DownloadOutcome::Downloaded { .. })
    }

    pub fn summary(&self) -> String {
        match &self.outcome {
            DownloadOutcome::Downloaded { path, bytes } => {
                format!("✅ {} -> {} ({} bytes)", self.url, path.display(), bytes)
            }
            DownloadOutcome::Failed { message, .. } => format!("❌ {}: {}", self.url, message),
        }
    }
}
