use crate::client::{ensure_output_dir, CatalogClient, FileDownloader};
use crate::error::{PtfError, Result};
use crate::models::{DownloadOutcome, DownloadResult, RowPredicate};
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::{info, warn};

/// Runs the whole pipeline for one client: search, parse, select, download.
pub struct BatchDownloader<'a> {
    client: &'a CatalogClient,
    downloader: FileDownloader,
}

impl<'a> BatchDownloader<'a> {
    pub fn new(client: &'a CatalogClient) -> Self {
        Self {
            client,
            downloader: FileDownloader::with_client(client.http().clone()),
        }
    }

    /// Download every selected row's ancillary file, then every processed file.
    ///
    /// A missing or unwritable output directory, search or catalog failures
    /// and any filesystem error while storing a file abort the batch.
    /// Individual download failures are recorded in the returned results and
    /// the batch carries on.
    pub async fn download_all(
        &self,
        out_dir: &Path,
        predicate: Option<&RowPredicate<'_>>,
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<DownloadResult>> {
        ensure_output_dir(out_dir).await?;

        let urls = self.client.image_urls(predicate).await?;
        let total = urls.len() * 2;
        info!(
            coordinate = %self.client.coordinate(),
            rows = urls.len(),
            files = total,
            "Starting batch download"
        );

        if let Some(progress) = progress {
            progress.set_length(total as u64);
        }

        let mut results = Vec::with_capacity(total);
        for (kind, url) in urls.download_order() {
            if let Some(progress) = progress {
                progress.set_message(&format!("Downloading {} image", kind));
            }

            let outcome = match self.downloader.download(url, out_dir).await {
                Ok((path, bytes)) => DownloadOutcome::Downloaded { path, bytes },
                Err(e @ PtfError::Filesystem { .. }) => {
                    warn!(url = %url, error = %e, "Cannot store download, aborting the batch");
                    return Err(e);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Download failed, continuing with the batch");
                    DownloadOutcome::Failed {
                        category: e.category().to_string(),
                        message: e.to_string(),
                    }
                }
            };

            let result = DownloadResult {
                url: url.to_string(),
                kind,
                outcome,
            };
            if let Some(progress) = progress {
                progress.increment(1);
                progress.println(&result.summary());
            }
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(
            succeeded = results.len() - failed,
            failed,
            "Batch download finished"
        );

        Ok(results)
    }
}
