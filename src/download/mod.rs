//! Bulk media downloader for instrument archives.
//!
//! This module turns `ListMediaFiles` listings into one `{display name}.zip`
//! per instrument, fetched from the service's bulk download endpoint.
//!
//! # Features
//!
//! - Download id extraction from stored media paths (`PIISD0<id>/`)
//! - Per-run deduplication by download id (first manifest entry wins)
//! - Skip-existing based on a directory snapshot taken at the start of a run
//! - Batched concurrency: a batch must fully settle before the next starts
//! - Streaming writes through one buffered file handle per archive
//!
//! # Example
//!
//! ```no_run
//! use katunog_core::config::ServiceConfig;
//! use katunog_core::download::{DownloadOptions, MediaDownloader};
//! use katunog_core::query::Pagination;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::default();
//! let downloader = MediaDownloader::connect(&config, DownloadOptions::new("downloads"))?;
//! let report = downloader.download_page(Pagination::new(1, 10)).await?;
//! println!("downloaded {} archives", report.downloaded);
//! # Ok(())
//! # }
//! ```

mod client;
mod download_id;
mod engine;
mod error;
mod filename;

pub use client::{HttpMediaFetcher, MediaFetcher, WRITE_CHUNK_SIZE};
pub use download_id::extract_download_id;
pub use engine::{
    DEFAULT_CONCURRENCY, DEFAULT_FILE_TYPE, DownloadOptions, DownloadReport, DownloadTask,
    MediaDownloader,
};
pub use error::{DownloadError, ExtractionError, RunError};
pub use filename::{ARCHIVE_EXTENSION, archive_file_name};
