//! Error types for the bulk media downloader.
//!
//! [`ExtractionError`] and [`DownloadError`] never abort a run: the downloader
//! logs them against the offending path or instrument and moves on.
//! [`RunError`] is reserved for failures with no meaningful partial result.

use std::path::PathBuf;

use thiserror::Error;

/// A stored file path that carries no bulk download id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no download id in file path {path:?}")]
pub struct ExtractionError {
    /// The path that failed to match, or `None` when the manifest entry had no path.
    pub path: Option<String>,
}

/// Errors that can occur while fetching one archive to disk.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (connection refused, TLS, body interrupted).
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL being fetched.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status.
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL being fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while writing the archive.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Fatal errors for a whole download run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Concurrency cap outside the accepted range.
    #[error("invalid concurrency value {value}: must be between {min} and {max}")]
    InvalidConcurrency {
        /// The rejected value.
        value: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// Output directory could not be created or listed.
    #[error("cannot prepare output directory {path}: {source}")]
    OutputDir {
        /// The output directory.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Catalog request failed; there is no partial page to work with.
    #[error("catalog request failed: {0}")]
    Api(#[from] crate::transport::ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display() {
        let error = DownloadError::http_status("https://example.com/zip", 404);
        let msg = error.to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(msg.contains("https://example.com/zip"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = DownloadError::io("/tmp/Agung.zip", io_error);
        assert!(error.to_string().contains("/tmp/Agung.zip"));
    }

    #[test]
    fn test_extraction_error_display() {
        let error = ExtractionError {
            path: Some("media/other/file.mp3".to_string()),
        };
        assert!(error.to_string().contains("media/other/file.mp3"));
    }

    #[test]
    fn test_invalid_concurrency_display() {
        let error = RunError::InvalidConcurrency { value: 0, min: 1, max: 100 };
        assert_eq!(
            error.to_string(),
            "invalid concurrency value 0: must be between 1 and 100"
        );
    }
}
