use crate::config::ClientConfig;
use crate::error::{PtfError, Result};
use crate::models::{CatalogTable, Coordinate, ImageUrls, RowPredicate};
use crate::processors::url_deriver::derive_image_urls;
use crate::readers::CatalogReader;
use reqwest::StatusCode;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Search URL for a position: `<base><ra>,<dec>` with six decimal places.
/// Out-of-range coordinates are passed through.
pub fn build_search_url(coordinate: &Coordinate, search_base_url: &str) -> String {
    format!("{}{}", search_base_url, coordinate.to_query_value())
}

pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Catalog search for a single sky position.
///
/// The search response is fetched on first use and kept for the lifetime of
/// the client; a different position needs a new client.
pub struct CatalogClient {
    coordinate: Coordinate,
    config: ClientConfig,
    http: reqwest::Client,
    reader: CatalogReader,
    response: OnceCell<String>,
}

impl CatalogClient {
    pub fn new(coordinate: Coordinate) -> Result<Self> {
        Self::with_config(coordinate, ClientConfig::default())
    }

    pub fn with_config(coordinate: Coordinate, config: ClientConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self {
            coordinate,
            config,
            http,
            reader: CatalogReader::new(),
            response: OnceCell::new(),
        })
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn search_url(&self) -> String {
        build_search_url(&self.coordinate, &self.config.search_base_url)
    }

    /// Raw text of the search response
    pub async fn response(&self) -> Result<&str> {
        let text = self
            .response
            .get_or_try_init(|| self.fetch(self.search_url()))
            .await?;
        Ok(text.as_str())
    }

    async fn fetch(&self, url: String) -> Result<String> {
        info!(url = %url, "Querying PTF image catalog");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(PtfError::RemoteService {
                status: status.as_u16(),
                url,
            });
        }

        let text = response.text().await?;
        debug!(url = %url, bytes = text.len(), "Catalog response received");
        Ok(text)
    }

    /// Parsed and typed catalog for this position
    pub async fn catalog(&self) -> Result<CatalogTable> {
        let text = self.response().await?;
        let parsed = self.reader.parse(text)?;
        let table = CatalogTable::from_parsed(parsed)?;

        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Catalog parsed"
        );
        Ok(table)
    }

    /// Download URLs for the rows selected by `predicate` (all rows when `None`)
    pub async fn image_urls(&self, predicate: Option<&RowPredicate<'_>>) -> Result<ImageUrls> {
        let table = self.catalog().await?;
        derive_image_urls(&table, &self.config.image_base_url, predicate)
    }
}
