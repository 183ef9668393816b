//! Error types for the GraphQL transport.

use thiserror::Error;

/// Errors raised while executing a query against the service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection could not be established or the request failed mid-flight.
    #[error("transport error calling {url}: {source}")]
    Transport {
        /// Endpoint that was called.
        url: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success status and a body that is not JSON.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Endpoint that was called.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Service answered successfully but the body is not valid JSON.
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        /// Endpoint that was called.
        url: String,
        /// JSON parser error.
        #[source]
        source: serde_json::Error,
    },

    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// Builder error.
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates a status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// True for connection and status failures, false for decode failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::HttpStatus { .. } | Self::ClientBuild { .. }
        )
    }
}
