//! Streaming archive fetcher.
//!
//! [`MediaFetcher`] is the seam between the batch engine and the network;
//! [`HttpMediaFetcher`] streams a GET response into a single open file handle.

use std::path::Path;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::error::DownloadError;
use crate::config::ServiceConfig;
use crate::transport::{ApiError, build_http_client};

/// Write buffer size; body chunks are flushed to disk in pieces of this size.
pub const WRITE_CHUNK_SIZE: usize = 8 * 1024;

/// Fetches one URL into one file.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Downloads `url` into `path`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] on non-success status, network or IO failure.
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64, DownloadError>;
}

/// HTTP implementation of [`MediaFetcher`].
#[derive(Debug, Clone)]
pub struct HttpMediaFetcher {
    client: Client,
}

impl HttpMediaFetcher {
    /// Creates a fetcher honouring the TLS setting of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Creates a fetcher reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    #[instrument(skip(self), fields(url = %url, path = %path.display()))]
    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        debug!("starting download");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let mut file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        let result = stream_to_file(&mut file, response, url, path).await;
        if result.is_err() {
            debug!("removing partial file after error");
            let _ = tokio::fs::remove_file(path).await;
        }
        let bytes = result?;

        info!(bytes, "download complete");
        Ok(bytes)
    }
}

/// Streams the response body through one buffered handle, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(WRITE_CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}
