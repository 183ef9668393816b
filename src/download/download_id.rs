//! Bulk download id extraction from stored media paths.
//!
//! The service stores media under a folder named after the instrument's
//! catalogue code, e.g. `.../PIISD0482/recording.mp3`. The numeric part after
//! the `PIISD0` prefix is the id the bulk download endpoint expects.

use std::sync::LazyLock;

use regex::Regex;

use super::error::ExtractionError;

#[allow(clippy::expect_used)]
static DOWNLOAD_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PIISD0(\d+)/").expect("download id regex is valid") // Static pattern, safe to panic
});

/// Returns the bulk download id embedded in `path`.
///
/// # Errors
///
/// Returns [`ExtractionError`] when the path does not contain `PIISD0<digits>/`.
pub fn extract_download_id(path: &str) -> Result<String, ExtractionError> {
    DOWNLOAD_ID_PATTERN
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ExtractionError {
            path: Some(path.to_string()),
        })
}
