//! Endpoint façade: one call per logical request kind.
//!
//! [`KatunogApi`] renders a [`QueryRequest`] through the query catalog and
//! sends it through a [`Transport`]. Responses are returned verbatim as JSON
//! trees; the helpers in this module read the few paths callers need and
//! substitute empty values for anything missing.
//!
//! # Example
//!
//! ```no_run
//! use katunog_core::api::KatunogApi;
//! use katunog_core::config::ServiceConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = KatunogApi::connect(&ServiceConfig::default())?;
//! let provinces = api.provinces().await?;
//! println!("{provinces}");
//! # Ok(())
//! # }
//! ```

pub mod table;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ServiceConfig;
use crate::query::{Pagination, QueryRequest};
use crate::transport::{ApiError, GraphqlClient, Transport};

pub use table::{COLUMNS, InstrumentRow, instrument_rows};

/// Client façade over the Katunog GraphQL API.
#[derive(Clone)]
pub struct KatunogApi {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for KatunogApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KatunogApi").finish_non_exhaustive()
    }
}

impl KatunogApi {
    /// Wraps an existing transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Builds a façade backed by a [`GraphqlClient`] for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the HTTP client cannot be built.
    pub fn connect(config: &ServiceConfig) -> Result<Self, ApiError> {
        Ok(Self::new(Arc::new(GraphqlClient::new(config)?)))
    }

    /// Executes one request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Propagates transport and decode failures; there is no partial result.
    #[instrument(skip(self), fields(kind = %request.kind()))]
    pub async fn fetch(&self, request: &QueryRequest) -> Result<Value, ApiError> {
        let query = request.to_graphql();
        let response = self.transport.execute(&query).await?;
        debug!("query completed");
        Ok(response)
    }

    /// Full instrument records.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn instruments(
        &self,
        pagination: Pagination,
        filter: &str,
    ) -> Result<Value, ApiError> {
        self.fetch(&QueryRequest::ListInstruments {
            pagination,
            filter: filter.to_string(),
        })
        .await
    }

    /// Instrument location hierarchy.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn locations(&self, pagination: Pagination) -> Result<Value, ApiError> {
        self.fetch(&QueryRequest::ListLocations(pagination)).await
    }

    /// Bilingual instrument descriptions.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn descriptions(&self, pagination: Pagination) -> Result<Value, ApiError> {
        self.fetch(&QueryRequest::ListDescriptions(pagination)).await
    }

    /// Instrument names with their file manifests.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn media_files(&self, pagination: Pagination) -> Result<Value, ApiError> {
        self.fetch(&QueryRequest::ListMediaFiles(pagination)).await
    }

    /// A single instrument by its service id.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn instrument_by_id(&self, id: &str) -> Result<Value, ApiError> {
        self.fetch(&QueryRequest::instrument_by_id(id)).await
    }

    /// All regions with their island.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn regions(&self) -> Result<Value, ApiError> {
        self.fetch(&QueryRequest::ListRegions).await
    }

    /// All provinces.
    ///
    /// # Errors
    ///
    /// See [`fetch`](Self::fetch).
    pub async fn provinces(&self) -> Result<Value, ApiError> {
        self.fetch(&QueryRequest::ListProvinces).await
    }
}

/// `data.instruments.objects` of a listing response, or an empty slice.
#[must_use]
pub fn instrument_objects(response: &Value) -> &[Value] {
    response
        .pointer("/data/instruments/objects")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// `data.instrument.localName` of a by-id response.
#[must_use]
pub fn instrument_local_name(response: &Value) -> Option<&str> {
    response
        .pointer("/data/instrument/localName")
        .and_then(Value::as_str)
}

/// `fileSet.edges[].node.path` values of one instrument object, in order.
///
/// Edges without a string path yield `None` so callers can report them.
#[must_use]
pub fn file_paths(instrument: &Value) -> Vec<Option<&str>> {
    instrument
        .pointer("/fileSet/edges")
        .and_then(Value::as_array)
        .map(|edges| {
            edges
                .iter()
                .map(|edge| edge.pointer("/node/path").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Pagination block of a listing response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// Current page.
    pub page: u64,
    /// Total number of pages.
    pub pages: u64,
    /// Whether a following page exists.
    pub has_next: bool,
    /// Whether a preceding page exists.
    pub has_prev: bool,
}

impl PageInfo {
    /// Reads `data.instruments.{page,pages,hasNext,hasPrev}`, defaulting missing fields.
    #[must_use]
    pub fn from_listing(response: &Value) -> Self {
        let Some(block) = response.pointer("/data/instruments") else {
            return Self::default();
        };
        Self {
            page: block.get("page").and_then(Value::as_u64).unwrap_or(0),
            pages: block.get("pages").and_then(Value::as_u64).unwrap_or(0),
            has_next: block.get("hasNext").and_then(Value::as_bool).unwrap_or(false),
            has_prev: block.get("hasPrev").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}
