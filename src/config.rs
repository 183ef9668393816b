//! Immutable service configuration shared by the GraphQL transport and the media fetcher.
//!
//! The configuration is built once (usually from CLI flags) and injected into
//! every component that talks to the service. Nothing here is global or mutable.

use url::Url;

/// Production base URL of the Katunog archive.
pub const DEFAULT_BASE_URL: &str = "https://katunog.asti.dost.gov.ph";

/// Path of the GraphQL endpoint relative to the base URL.
pub const API_PATH: &str = "api/";

/// Path of the per-instrument bulk download endpoint relative to the base URL.
pub const BULK_DOWNLOAD_PATH: &str = "instruments/download_all_files";

/// HTTP connect timeout. No overall request timeout is applied.
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while building a [`ServiceConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL could not be parsed.
    #[error("invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        /// The rejected input.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Connection settings for the Katunog service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    base_url: Url,
    verify_tls: bool,
}

impl Default for ServiceConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL).expect("static base URL is valid")
    }
}

impl ServiceConfig {
    /// Creates a configuration pointing at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url: normalize_base(parsed),
            verify_tls: true,
        })
    }

    /// Toggles TLS certificate verification.
    #[must_use]
    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    /// Base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether TLS certificates are verified.
    #[must_use]
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    /// Full URL of the GraphQL endpoint.
    #[must_use]
    pub fn api_url(&self) -> Url {
        self.join(API_PATH)
    }

    /// Bulk download URL for one instrument and media type.
    #[must_use]
    pub fn bulk_download_url(&self, download_id: &str, file_type: &str) -> Url {
        let mut url = self.join(BULK_DOWNLOAD_PATH);
        url.query_pairs_mut()
            .append_pair("instrument_id", download_id)
            .append_pair("file_type", file_type);
        url
    }

    fn join(&self, path: &str) -> Url {
        // Joining a relative path onto a base ending in '/' cannot fail.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
