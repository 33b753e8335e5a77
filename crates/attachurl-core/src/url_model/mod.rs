//! URL validation and filename derivation.
//!
//! Turns a raw URL line into its basename and lower-cased extension, checking
//! the extension against a field's allow-list before anything is downloaded.

mod path;
mod sanitize;

pub use path::{basename_from_url_path, extension_of, has_path_component};
pub use sanitize::local_file_name;

use crate::model::AllowedExtensions;

/// A URL that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// The trimmed URL as submitted.
    pub url: String,
    /// Last path segment, still percent-encoded.
    pub basename: String,
    /// Lower-cased text after the last `.` of the basename.
    pub extension: Option<String>,
}

/// Why a URL was rejected before download. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlRejection {
    #[error("{url} is not a valid URL.")]
    InvalidUrl { url: String },
    #[error("The URL {url} has no parsable path.")]
    NoParsablePath { url: String },
    #[error("The URL {url} has no parsable basename.")]
    NoParsableBasename { url: String },
    #[error("{extension} is not an allowed extension for field \"{field}\".")]
    DisallowedExtension { extension: String, field: String },
}

/// Validates `raw` for a field named `field` with the given allow-list.
///
/// # Examples
///
/// - `https://example.com/a/photo.JPG` → basename `photo.JPG`, extension `jpg`
/// - `https://example.com/render?id=4` → rejected, no path
/// - `https://example.com/` → rejected, no basename
pub fn validate(
    raw: &str,
    field: &str,
    allowed: &AllowedExtensions,
) -> Result<ParsedUrl, UrlRejection> {
    let url = raw.trim();
    let parsed = parse_syntax(url).ok_or_else(|| UrlRejection::InvalidUrl {
        url: url.to_string(),
    })?;

    if !has_path_component(url) {
        return Err(UrlRejection::NoParsablePath {
            url: url.to_string(),
        });
    }

    let basename =
        basename_from_url_path(parsed.path()).ok_or_else(|| UrlRejection::NoParsableBasename {
            url: url.to_string(),
        })?;

    let extension = extension_of(&basename);
    if let Some(ext) = &extension {
        if !allowed.contains(ext) {
            return Err(UrlRejection::DisallowedExtension {
                extension: ext.clone(),
                field: field.to_string(),
            });
        }
    }

    Ok(ParsedUrl {
        url: url.to_string(),
        basename,
        extension,
    })
}

/// `scheme://host...` with no raw whitespace or non-ASCII characters.
fn parse_syntax(url: &str) -> Option<url::Url> {
    if url.is_empty() || url.chars().any(|c| c.is_whitespace() || !c.is_ascii()) {
        return None;
    }
    let parsed = url::Url::parse(url).ok()?;
    // The parser repairs `http:/host`; the raw text must already be well formed.
    if !url[parsed.scheme().len()..].starts_with("://") {
        return None;
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(parsed),
        _ => None,
    }
}
