//! Katunog Core Library
//!
//! Client library for the Katunog digital archive of Philippine musical
//! instruments: typed GraphQL queries, a tabular export of instrument
//! listings, and a bulk downloader for instrument media archives.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`query`] - Request kinds and their GraphQL templates
//! - [`transport`] - One HTTPS POST per query, JSON decoding
//! - [`api`] - Endpoint façade and instrument table export
//! - [`download`] - Batched, deduplicated archive downloads
//! - [`archive`] - Extraction of downloaded zip archives
//! - [`config`] - Immutable service configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod archive;
pub mod config;
pub mod download;
pub mod query;
pub mod transport;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use api::{InstrumentRow, KatunogApi, PageInfo, instrument_rows};
pub use archive::{ArchiveError, ArchiveExtractor, ExtractionSummary};
pub use config::{ConfigError, ServiceConfig};
pub use download::{
    DEFAULT_CONCURRENCY, DEFAULT_FILE_TYPE, DownloadError, DownloadOptions, DownloadReport,
    ExtractionError, MediaDownloader, MediaFetcher, RunError, extract_download_id,
};
pub use query::{DEFAULT_FILTER, Pagination, QueryKind, QueryRequest};
pub use transport::{ApiError, GraphqlClient, Transport};
