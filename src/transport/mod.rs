//! Transport layer: one HTTPS POST per GraphQL query.
//!
//! [`Transport`] is the seam between the endpoint façade and the network.
//! [`GraphqlClient`] is the production implementation; tests substitute their
//! own implementation to record issued queries.

mod client;
mod error;

pub use client::{GraphqlClient, build_http_client};
pub use error::ApiError;

use async_trait::async_trait;
use serde_json::Value;

/// Executes GraphQL documents and returns the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `query` once and returns the parsed response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on connection, status or decode failures. No retry
    /// is attempted.
    async fn execute(&self, query: &str) -> Result<Value, ApiError>;
}
