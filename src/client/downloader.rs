use crate::config::ClientConfig;
use crate::error::{PtfError, Result};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use crate::utils::filename::filename_from_url;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Fails with `PtfError::Filesystem` unless `out_dir` is an existing, writable directory
pub async fn ensure_output_dir(out_dir: &Path) -> Result<()> {
    match fs::metadata(out_dir).await {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(PtfError::filesystem(out_dir, "not a directory")),
        Err(e) => return Err(PtfError::filesystem(out_dir, e.to_string())),
    }

    // Dropped right away, which deletes it again
    tempfile::Builder::new()
        .prefix(".ptf-write-check")
        .tempfile_in(out_dir)
        .map(drop)
        .map_err(|e| PtfError::filesystem(out_dir, format!("not writable: {}", e)))
}

/// Fetches single image files into an existing directory
pub struct FileDownloader {
    http: reqwest::Client,
}

impl FileDownloader {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: super::search::build_http_client(config)?,
        })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Download `url` to `out_dir/<final path segment>` and return the path
    /// and the number of bytes written.
    ///
    /// The body is gathered chunk by chunk and written to `<name>.part` once,
    /// which is renamed onto `<name>` when complete. Nothing is created
    /// before the whole body arrived, and a failed write only removes the
    /// `.part` file.
    pub async fn download(&self, url: &str, out_dir: &Path) -> Result<(PathBuf, u64)> {
        ensure_output_dir(out_dir).await?;

        let filename = filename_from_url(url);
        if filename.is_empty() {
            return Err(download_error(url, "URL has no file name"));
        }
        let target = out_dir.join(filename);
        let partial = out_dir.join(format!("{}.part", filename));

        debug!(url = %url, path = %target.display(), "Starting download");

        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(url, describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(url, format!("HTTP {}", status)));
        }

        // Content-Length is untrusted, cap the initial reservation
        let hint = response
            .content_length()
            .unwrap_or(0)
            .min(DEFAULT_BUFFER_SIZE as u64) as usize;
        let mut body = Vec::with_capacity(hint);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| download_error(url, describe_transport_error(&e)))?
        {
            body.extend_from_slice(&chunk);
        }

        if let Err(e) = store_file(&partial, &target, &body).await {
            if fs::remove_file(&partial).await.is_ok() {
                warn!(path = %partial.display(), "Removed partially written file");
            }
            return Err(PtfError::filesystem(&target, e.to_string()));
        }

        let bytes = body.len() as u64;
        info!(url = %url, path = %target.display(), bytes, "Downloaded");
        Ok((target, bytes))
    }
}

async fn store_file(partial: &Path, target: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(partial).await?;
    file.write_all(body).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(partial, target).await
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

fn download_error(url: &str, message: impl Into<String>) -> PtfError {
    PtfError::Download {
        url: url.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn downloader() -> FileDownloader {
        FileDownloader::new(&ClientConfig::default().with_timeout_secs(5)).unwrap()
    }

    fn dir_listing(dir: &Path) -> Vec<PathBuf> {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        entries
    }

    #[tokio::test]
    async fn test_download_writes_complete_body() {
        let server = MockServer::start().await;
        let body: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        Mock::given(method("GET"))
            .and(path("/data/proc/2009/PTF_c05.fits"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let url = format!("{}/data/proc/2009/PTF_c05.fits", server.uri());
        let (written, bytes) = downloader().download(&url, temp_dir.path()).await.unwrap();

        assert_eq!(written, temp_dir.path().join("PTF_c05.fits"));
        assert_eq!(bytes, body.len() as u64);
        assert_eq!(std::fs::read(&written).unwrap(), body);
        assert_eq!(dir_listing(temp_dir.path()), vec![written]);
    }

    #[tokio::test]
    async fn test_download_oversized_content_length() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 18446744073709551612\r\n\r\nabc")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let temp_dir = TempDir::new().unwrap();
        let url = format!("http://{}/data/PTF_huge.fits", addr);
        let err = downloader().download(&url, temp_dir.path()).await.unwrap_err();

        assert!(matches!(err, PtfError::Download { ref url, .. } if url.ends_with("PTF_huge.fits")));
        assert!(dir_listing(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new copy".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let existing = temp_dir.path().join("PTF_c05.fits");
        std::fs::write(&existing, b"earlier copy").unwrap();
        // A directory in the way of the staging file makes the write fail
        std::fs::create_dir(temp_dir.path().join("PTF_c05.fits.part")).unwrap();

        let url = format!("{}/data/PTF_c05.fits", server.uri());
        let err = downloader().download(&url, temp_dir.path()).await.unwrap_err();

        assert!(matches!(err, PtfError::Filesystem { .. }));
        assert_eq!(std::fs::read(&existing).unwrap(), b"earlier copy");
    }

    #[tokio::test]
    async fn test_ensure_output_dir_leaves_no_trace() {
        let temp_dir = TempDir::new().unwrap();
        ensure_output_dir(temp_dir.path()).await.unwrap();
        assert!(dir_listing(temp_dir.path()).is_empty());

        let file = temp_dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = ensure_output_dir(&file).await.unwrap_err();
        assert!(matches!(err, PtfError::Filesystem { ref message, .. } if message == "not a directory"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ensure_output_dir_rejects_read_only_dir() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let read_only = temp_dir.path().join("read-only");
        std::fs::create_dir(&read_only).unwrap();
        std::fs::set_permissions(&read_only, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind a privileged user
        let writable_anyway = std::fs::write(read_only.join("check"), b"x").is_ok();
        let result = ensure_output_dir(&read_only).await;
        std::fs::set_permissions(&read_only, std::fs::Permissions::from_mode(0o755)).unwrap();
        if writable_anyway {
            return;
        }

        let err = result.unwrap_err();
        assert!(matches!(err, PtfError::Filesystem { ref message, .. } if message.starts_with("not writable")));
    }

    #[tokio::test]
    async fn test_download_unreachable_host_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let before = dir_listing(temp_dir.path());

        // Port 1 on loopback refuses connections
        let err = downloader()
            .download("http://127.0.0.1:1/data/PTF_c05.fits", temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, PtfError::Download { ref url, .. } if url.ends_with("PTF_c05.fits")));
        assert_eq!(dir_listing(temp_dir.path()), before);
    }

    #[tokio::test]
    async fn test_download_http_error_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let url = format!("{}/data/missing.fits", server.uri());
        let err = downloader().download(&url, temp_dir.path()).await.unwrap_err();

        assert!(matches!(err, PtfError::Download { ref message, .. } if message.contains("404")));
        assert!(dir_listing(temp_dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_download_missing_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let err = downloader()
            .download("http://127.0.0.1:1/x.fits", &missing)
            .await
            .unwrap_err();

        assert!(matches!(err, PtfError::Filesystem { .. }));
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn test_download_url_without_filename() {
        let temp_dir = TempDir::new().unwrap();
        let err = downloader()
            .download("http://127.0.0.1:1/data/", temp_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, PtfError::Download { .. }));
    }
}
