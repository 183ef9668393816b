//! Archive file naming.

/// Suffix of every downloaded archive.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// File name for an instrument's archive: `{display name}.zip`.
///
/// Characters that are not allowed in file names on common platforms are
/// replaced with `_`, so a name can never point outside the output directory.
#[must_use]
pub fn archive_file_name(display_name: &str) -> String {
    format!("{}{ARCHIVE_EXTENSION}", sanitize_file_stem(display_name))
}

fn sanitize_file_stem(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized == "." || sanitized == ".." {
        "_".to_string()
    } else {
        sanitized
    }
}
