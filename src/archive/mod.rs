//! Extraction of downloaded instrument archives.
//!
//! [`ArchiveExtractor`] unpacks every `.zip` in one directory into another.
//! A malformed archive is logged and counted; it never stops the run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, instrument};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::download::ARCHIVE_EXTENSION;

/// Errors raised while extracting archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The file is not a readable zip container.
    #[error("bad zip file {path}: {source}")]
    BadZip {
        /// The archive.
        path: PathBuf,
        /// Zip reader error.
        #[source]
        source: ZipError,
    },

    /// An entry would be written outside the output directory.
    #[error("unsafe entry path in {path}: {entry}")]
    UnsafeEntry {
        /// The archive.
        path: PathBuf,
        /// Raw entry name.
        entry: String,
    },

    /// Filesystem error reading the archive or writing its contents.
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    fn bad_zip(path: impl Into<PathBuf>, source: ZipError) -> Self {
        Self::BadZip {
            path: path.into(),
            source,
        }
    }
}

/// Outcome of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Archives fully extracted.
    pub extracted: Vec<PathBuf>,
    /// Archives that failed, with the error message that was logged.
    pub failed: Vec<(PathBuf, String)>,
}

/// Extracts every `.zip` found in `zip_dir` into `output_dir`.
#[derive(Debug, Clone)]
pub struct ArchiveExtractor {
    zip_dir: PathBuf,
    output_dir: PathBuf,
}

impl ArchiveExtractor {
    /// Creates an extractor, creating `output_dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] if the output directory cannot be created.
    pub fn new(
        zip_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, ArchiveError> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|e| ArchiveError::io(&output_dir, e))?;
        Ok(Self {
            zip_dir: zip_dir.into(),
            output_dir,
        })
    }

    /// Extracts all archives, in file-name order.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::Io`] only if `zip_dir` cannot be listed.
    /// Failures of individual archives are logged and recorded in the summary.
    #[instrument(skip(self), fields(zip_dir = %self.zip_dir.display(), output_dir = %self.output_dir.display()))]
    pub fn extract_all(&self) -> Result<ExtractionSummary, ArchiveError> {
        let mut archives = Vec::new();
        let entries = fs::read_dir(&self.zip_dir).map_err(|e| ArchiveError::io(&self.zip_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| ArchiveError::io(&self.zip_dir, e))?;
            let path = entry.path();
            if path.is_file() && has_zip_extension(&path) {
                archives.push(path);
            } else {
                debug!(path = %path.display(), "skipping non-archive entry");
            }
        }
        archives.sort();

        let mut summary = ExtractionSummary::default();
        for archive in archives {
            match extract_zip(&archive, &self.output_dir) {
                Ok(()) => {
                    info!(archive = %archive.display(), "extracted");
                    summary.extracted.push(archive);
                }
                Err(e) => {
                    error!(archive = %archive.display(), error = %e, "failed to extract");
                    summary.failed.push((archive, e.to_string()));
                }
            }
        }
        Ok(summary)
    }
}

fn has_zip_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(ARCHIVE_EXTENSION))
}

/// Extracts one archive into `target_dir`, rejecting entries that escape it.
///
/// # Errors
///
/// Returns [`ArchiveError`] for unreadable archives, unsafe entry names or IO failures.
pub fn extract_zip(zip_path: &Path, target_dir: &Path) -> Result<(), ArchiveError> {
    let file = fs::File::open(zip_path).map_err(|e| ArchiveError::io(zip_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| ArchiveError::bad_zip(zip_path, e))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ArchiveError::bad_zip(zip_path, e))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ArchiveError::UnsafeEntry {
                path: zip_path.to_path_buf(),
                entry: entry.name().to_string(),
            });
        };
        let entry_path = target_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&entry_path).map_err(|e| ArchiveError::io(&entry_path, e))?;
            continue;
        }

        if let Some(parent) = entry_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
        }
        let mut outfile =
            fs::File::create(&entry_path).map_err(|e| ArchiveError::io(&entry_path, e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| ArchiveError::io(&entry_path, e))?;
    }
    Ok(())
}
