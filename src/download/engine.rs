//! Bulk media download engine.
//!
//! The engine walks `ListMediaFiles` pages, turns each distinct bulk download
//! id into a [`DownloadTask`], and runs the tasks in batches.
//!
//! # Concurrency model
//!
//! Downloads are futures joined on the calling task; nothing is spawned onto
//! other threads. At most `concurrency` tasks are scheduled before the engine
//! stops scanning and runs the whole batch with `join_all`. Scanning resumes
//! only after every task in the batch has settled, so batches never overlap.
//!
//! # Skipping
//!
//! - a file manifest entry without a `PIISD0<id>/` path (logged)
//! - a download id already seen in this run (first entry wins)
//! - a target file that was in the output directory when the run started
//! - a target file name already scheduled by another id in this run

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::client::{HttpMediaFetcher, MediaFetcher};
use super::download_id::extract_download_id;
use super::error::{ExtractionError, RunError};
use super::filename::archive_file_name;
use crate::api::{KatunogApi, PageInfo, file_paths, instrument_local_name, instrument_objects};
use crate::config::ServiceConfig;
use crate::query::Pagination;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default number of downloads per batch.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default media type requested from the bulk download endpoint.
pub const DEFAULT_FILE_TYPE: &str = "audio";

/// Settings for one download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Directory receiving `{display name}.zip` files.
    pub output_dir: PathBuf,
    /// `file_type` query parameter of the bulk download endpoint.
    pub file_type: String,
    /// Maximum downloads in flight per batch.
    pub concurrency: usize,
}

impl DownloadOptions {
    /// Options with the default file type and concurrency.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_type: DEFAULT_FILE_TYPE.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets the requested media type.
    #[must_use]
    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    /// Sets the batch size.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// One scheduled archive download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Service identifier of the instrument.
    pub instrument_id: String,
    /// Name resolved by the by-id lookup.
    pub display_name: String,
    /// Id extracted from the stored file path.
    pub download_id: String,
    /// Bulk download URL.
    pub url: String,
    /// Target file.
    pub path: PathBuf,
}

/// Counters for one run. Every counted event is also logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Listing pages processed.
    pub pages: usize,
    /// Tasks scheduled.
    pub scheduled: usize,
    /// Tasks that completed.
    pub downloaded: usize,
    /// Tasks that failed.
    pub failed: usize,
    /// Targets already present before the run.
    pub skipped_existing: usize,
    /// Manifest entries whose download id was already seen.
    pub duplicate_ids: usize,
    /// Distinct ids whose target name was already scheduled.
    pub duplicate_names: usize,
    /// Manifest entries without a download id.
    pub extraction_errors: usize,
    /// By-id lookups that failed or returned no name.
    pub name_lookup_failures: usize,
    /// Size of each executed batch, in order.
    pub batches: Vec<usize>,
}

/// Mutable state shared across the pages of one run.
#[derive(Debug, Default)]
struct RunState {
    existing: HashSet<String>,
    seen_ids: HashSet<String>,
    scheduled_names: HashSet<String>,
    pending: Vec<DownloadTask>,
    report: DownloadReport,
}

/// Downloads instrument media archives in bounded batches.
pub struct MediaDownloader {
    api: KatunogApi,
    fetcher: Arc<dyn MediaFetcher>,
    config: ServiceConfig,
    options: DownloadOptions,
}

impl std::fmt::Debug for MediaDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDownloader")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl MediaDownloader {
    /// Creates a downloader from its collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidConcurrency`] if the cap is outside 1..=100.
    pub fn new(
        api: KatunogApi,
        fetcher: Arc<dyn MediaFetcher>,
        config: ServiceConfig,
        options: DownloadOptions,
    ) -> Result<Self, RunError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&options.concurrency) {
            return Err(RunError::InvalidConcurrency {
                value: options.concurrency,
                min: MIN_CONCURRENCY,
                max: MAX_CONCURRENCY,
            });
        }

        debug!(
            concurrency = options.concurrency,
            file_type = %options.file_type,
            output_dir = %options.output_dir.display(),
            "creating media downloader"
        );

        Ok(Self {
            api,
            fetcher,
            config,
            options,
        })
    }

    /// Creates a downloader talking HTTP to the service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Api`] if an HTTP client cannot be built, or
    /// [`RunError::InvalidConcurrency`] for a bad cap.
    pub fn connect(config: &ServiceConfig, options: DownloadOptions) -> Result<Self, RunError> {
        let api = KatunogApi::connect(config)?;
        let fetcher = Arc::new(HttpMediaFetcher::new(config)?);
        Self::new(api, fetcher, config.clone(), options)
    }

    /// Returns the run options.
    #[must_use]
    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Downloads the archives referenced by one listing page.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] if the output directory cannot be prepared or the
    /// listing request fails. Per-item failures are logged and counted instead.
    pub async fn download_page(&self, pagination: Pagination) -> Result<DownloadReport, RunError> {
        self.download_pages(pagination, Some(1)).await
    }

    /// Walks consecutive pages starting at `first`, while the service reports
    /// a next page, up to `max_pages` pages when given. The walk also ends at
    /// the largest representable page number.
    ///
    /// The directory snapshot and the seen-id set are shared by all pages.
    ///
    /// # Errors
    ///
    /// See [`download_page`](Self::download_page). Tasks already scheduled
    /// when a listing request fails are still executed before the error is
    /// returned.
    #[instrument(skip(self), fields(output_dir = %self.options.output_dir.display()))]
    pub async fn download_pages(
        &self,
        first: Pagination,
        max_pages: Option<u32>,
    ) -> Result<DownloadReport, RunError> {
        let mut state = RunState {
            existing: snapshot_output_dir(&self.options.output_dir).await?,
            ..RunState::default()
        };
        info!(existing = state.existing.len(), "starting download run");

        let mut page = first.page;
        let mut processed: u32 = 0;
        loop {
            let page_info = match self
                .process_page(&mut state, Pagination::new(page, first.limit))
                .await
            {
                Ok(info) => info,
                Err(e) => {
                    self.run_batch(&mut state).await;
                    return Err(e);
                }
            };
            processed += 1;
            state.report.pages += 1;

            if !page_info.has_next || max_pages.is_some_and(|max| processed >= max) {
                break;
            }
            let Some(next) = page.checked_add(1) else {
                warn!(page, "page number limit reached; stopping walk");
                break;
            };
            page = next;
        }

        self.run_batch(&mut state).await;

        let report = state.report;
        info!(
            pages = report.pages,
            scheduled = report.scheduled,
            downloaded = report.downloaded,
            failed = report.failed,
            skipped_existing = report.skipped_existing,
            "download run complete"
        );
        Ok(report)
    }

    /// Scans one page, scheduling tasks and running full batches as they fill.
    #[instrument(skip(self, state), fields(page = pagination.page, limit = pagination.limit))]
    async fn process_page(
        &self,
        state: &mut RunState,
        pagination: Pagination,
    ) -> Result<PageInfo, RunError> {
        let response = self.api.media_files(pagination).await?;
        let instruments = instrument_objects(&response);
        debug!(instruments = instruments.len(), "listing page fetched");

        for instrument in instruments {
            self.scan_instrument(state, instrument).await;
        }

        Ok(PageInfo::from_listing(&response))
    }

    async fn scan_instrument(&self, state: &mut RunState, instrument: &Value) {
        let instrument_id = instrument
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let listing_name = instrument.get("localName").and_then(Value::as_str);

        // Resolved lazily, once per instrument, on its first new download id.
        let mut display_name: Option<String> = None;
        let mut looked_up = false;

        for path in file_paths(instrument) {
            let download_id = match path
                .ok_or(ExtractionError { path: None })
                .and_then(extract_download_id)
            {
                Ok(id) => id,
                Err(e) => {
                    error!(instrument_id, error = %e, "failed to extract download id");
                    state.report.extraction_errors += 1;
                    continue;
                }
            };

            if !state.seen_ids.insert(download_id.clone()) {
                debug!(instrument_id, download_id = %download_id, "download id already processed");
                state.report.duplicate_ids += 1;
                continue;
            }

            if !looked_up {
                looked_up = true;
                display_name = self
                    .resolve_display_name(instrument_id, listing_name, &mut state.report)
                    .await;
            }
            let Some(name) = display_name.as_deref() else {
                warn!(instrument_id, download_id = %download_id, "no display name; skipping");
                continue;
            };
            info!(download_id = %download_id, instrument = name, "extracted download id");

            let file_name = archive_file_name(name);
            if state.existing.contains(&file_name) {
                info!(
                    instrument = name,
                    output_dir = %self.options.output_dir.display(),
                    "already downloaded"
                );
                state.report.skipped_existing += 1;
                continue;
            }
            if !state.scheduled_names.insert(file_name.clone()) {
                warn!(
                    instrument = name,
                    download_id = %download_id,
                    "target file already scheduled in this run"
                );
                state.report.duplicate_names += 1;
                continue;
            }

            let url = self
                .config
                .bulk_download_url(&download_id, &self.options.file_type)
                .to_string();
            info!(instrument = name, url = %url, "scheduling download");
            state.pending.push(DownloadTask {
                instrument_id: instrument_id.to_string(),
                display_name: name.to_string(),
                download_id,
                url,
                path: self.options.output_dir.join(&file_name),
            });
            state.report.scheduled += 1;

            if state.pending.len() >= self.options.concurrency {
                self.run_batch(state).await;
            }
        }
    }

    /// Looks the instrument up by id, falling back to the listing's name.
    async fn resolve_display_name(
        &self,
        instrument_id: &str,
        listing_name: Option<&str>,
        report: &mut DownloadReport,
    ) -> Option<String> {
        if instrument_id.is_empty() {
            warn!("instrument without id in listing");
        } else {
            match self.api.instrument_by_id(instrument_id).await {
                Ok(response) => match instrument_local_name(&response) {
                    Some(name) => {
                        if listing_name.is_some_and(|listed| listed != name) {
                            debug!(
                                instrument_id,
                                listed = ?listing_name,
                                name,
                                "lookup name differs from listing"
                            );
                        }
                        return Some(name.to_string());
                    }
                    None => warn!(instrument_id, "instrument lookup returned no name"),
                },
                Err(e) => warn!(instrument_id, error = %e, "instrument lookup failed"),
            }
        }

        report.name_lookup_failures += 1;
        listing_name.map(str::to_string)
    }

    /// Runs every pending task concurrently and waits for all of them.
    async fn run_batch(&self, state: &mut RunState) {
        if state.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut state.pending);
        state.report.batches.push(batch.len());
        info!(
            batch = state.report.batches.len(),
            size = batch.len(),
            "starting download batch"
        );

        let results = join_all(
            batch
                .iter()
                .map(|task| self.fetcher.fetch_to_file(&task.url, &task.path)),
        )
        .await;

        for (task, result) in batch.iter().zip(results) {
            match result {
                Ok(bytes) => {
                    info!(
                        instrument = %task.display_name,
                        path = %task.path.display(),
                        bytes,
                        "downloaded"
                    );
                    state.report.downloaded += 1;
                }
                Err(e) => {
                    error!(
                        instrument = %task.display_name,
                        url = %task.url,
                        error = %e,
                        "failed to download"
                    );
                    state.report.failed += 1;
                }
            }
        }
    }
}

/// Creates `dir` if needed and returns the names of the files it holds.
async fn snapshot_output_dir(dir: &Path) -> Result<HashSet<String>, RunError> {
    let to_error = |source| RunError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };

    tokio::fs::create_dir_all(dir).await.map_err(to_error)?;

    let mut names = HashSet::new();
    let mut entries = tokio::fs::read_dir(dir).await.map_err(to_error)?;
    while let Some(entry) = entries.next_entry().await.map_err(to_error)? {
        if let Some(name) = entry.file_name().to_str() {
            names.insert(name.to_string());
        }
    }
    Ok(names)
}
