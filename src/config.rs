//! Client configuration.
//!
//! Values are layered: built-in IRSA defaults, then an optional config file,
//! then `PTF_*` environment variables.

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_IMAGE_BASE_URL, DEFAULT_SEARCH_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ClientConfig {
    /// Search endpoint prefix; the `ra,dec` pair is appended verbatim
    #[validate(url)]
    pub search_base_url: String,

    /// Prefix joined with catalog filename columns
    #[validate(url)]
    pub image_base_url: String,

    /// Per-request timeout in seconds, 0 for none
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load defaults, the optional file and the environment, then validate
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder()
            .set_default("search_base_url", DEFAULT_SEARCH_BASE_URL)?
            .set_default("image_base_url", DEFAULT_IMAGE_BASE_URL)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?;

        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn with_search_base_url(mut self, url: impl Into<String>) -> Self {
        self.search_base_url = url.into();
        self
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
