//! URI normalization and validation
//!
//! Accepts bare filesystem paths, `file:` URIs, and `s3://` URIs and brings
//! them into one canonical absolute form. Locations are validated against
//! path traversal before any destructive operation; the traversal guard runs
//! on the raw string because `Url::parse` resolves dot segments itself and
//! would otherwise mask an escaping path.

use url::Url;

use crate::error::{Error, Result};

/// Cloud storage schemes accepted as-is by [`convert_relative_path_to_uri`]
pub const SUPPORTED_CLOUD_SCHEMES: &[&str] = &["s3"];

/// Storage backend selected by a URI scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageScheme {
    /// Local filesystem (`file:` or a bare path)
    Local,
    /// S3-compatible object storage (`s3:`)
    ObjectStorage,
    /// Any other scheme; rejected by directory operations
    Unsupported(String),
}

impl StorageScheme {
    /// Classify a parsed URL by its scheme
    pub fn of(url: &Url) -> Self {
        match url.scheme() {
            "file" => StorageScheme::Local,
            "s3" => StorageScheme::ObjectStorage,
            other => StorageScheme::Unsupported(other.to_string()),
        }
    }
}

fn has_uri_scheme(location: &str) -> bool {
    location.starts_with("s3://") || location.starts_with("file:")
}

fn file_uri_from_path(path: &str) -> Result<Url> {
    let absolute = std::path::absolute(path)
        .map_err(|e| Error::InvalidLocation(format!("Invalid path: {path}: {e}")))?;
    Url::from_file_path(&absolute)
        .map_err(|_| Error::InvalidLocation(format!("Invalid path: {path}")))
}

/// Canonical string form of a location, before any dot-segment resolution
///
/// Any scheme-qualified string passes through untouched, so the traversal
/// guard still sees `.` and `..` segments and the dispatcher can reject
/// unsupported schemes by name; bare paths are resolved against the working
/// directory into a `file:///` URI.
pub(crate) fn canonical_uri_string(location: &str) -> Result<String> {
    if uri_scheme(location).is_some() {
        Ok(location.to_string())
    } else {
        Ok(file_uri_from_path(location)?.to_string())
    }
}

/// Parse a location into a canonical absolute URL
///
/// Strings with scheme `s3` or `file` parse as-is; anything else is treated
/// as a filesystem path, resolved to an absolute path against the working
/// directory, and converted to an authority-less `file:///` URI.
pub fn create_uri(location: &str) -> Result<Url> {
    if has_uri_scheme(location) {
        Url::parse(location).map_err(|e| Error::InvalidLocation(format!("{location}: {e}")))
    } else {
        file_uri_from_path(location)
    }
}

/// Convert a path into canonical URI form
///
/// `None` passes through. Supported cloud URIs are already canonical and
/// return unchanged; everything else goes through [`create_uri`], which also
/// rewrites single-slash `file:/` forms to `file:///`.
pub fn convert_relative_path_to_uri(path: Option<&str>) -> Result<Option<String>> {
    match path {
        None => Ok(None),
        Some(p) if is_supported_cloud_storage_uri(p) => Ok(Some(p.to_string())),
        Some(p) => Ok(Some(create_uri(p)?.to_string())),
    }
}

/// Whether the string is a URI with a supported cloud storage scheme
pub fn is_supported_cloud_storage_uri(location: &str) -> bool {
    match uri_scheme(location) {
        Some(scheme) => SUPPORTED_CLOUD_SCHEMES.contains(&scheme),
        None => false,
    }
}

/// Validate a location string before it is persisted or operated on
///
/// Fails when the scheme is absent, the URI is malformed, or resolving `.`
/// and `..` segments yields a path that is not a prefix-extension of the raw
/// path. The prefix comparison is intentionally strict: a path ending in `.`
/// is rejected even though it re-resolves to the same directory.
pub fn assert_valid_location(location: &str) -> Result<()> {
    if uri_scheme(location).is_none() {
        return Err(Error::InvalidLocation(format!("Invalid path: {location}")));
    }
    Url::parse(location).map_err(|e| Error::InvalidLocation(format!("{location}: {e}")))?;

    let path = raw_path(location);
    let normalized = remove_dot_segments(path);
    if !normalized.starts_with(path) {
        return Err(Error::InvalidLocation(format!(
            "Normalization failed: {path}"
        )));
    }
    Ok(())
}

/// RFC 3986 scheme of a URI string, if present
fn uri_scheme(location: &str) -> Option<&str> {
    let colon = location.find(':')?;
    let scheme = &location[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(scheme)
    } else {
        None
    }
}

/// Path component of a URI string, without any dot-segment resolution
fn raw_path(location: &str) -> &str {
    let rest = match location.find(':') {
        Some(i) => &location[i + 1..],
        None => location,
    };
    let rest = match rest.strip_prefix("//") {
        Some(after_authority) => match after_authority.find('/') {
            Some(i) => &after_authority[i..],
            None => "",
        },
        None => rest,
    };
    match rest.find(['?', '#']) {
        Some(i) => &rest[..i],
        None => rest,
    }
}

/// Resolve `.` and `..` path segments (RFC 3986 section 5.2.4)
fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_last_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let end = input[1..].find('/').map(|i| i + 1).unwrap_or(input.len());
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }

    output
}

fn pop_last_segment(output: &mut String) {
    match output.rfind('/') {
        Some(i) => output.truncate(i),
        None => output.clear(),
    }
}
