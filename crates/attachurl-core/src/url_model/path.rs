//! Basename and extension extraction from URL paths.

/// Whether the raw URL text has a path after its authority (`/` included).
/// `https://example.com?q` has none; `https://example.com/` has `/`.
pub fn has_path_component(raw: &str) -> bool {
    let Some((_, rest)) = raw.split_once("://") else {
        return false;
    };
    let rest = rest.split(['?', '#']).next().unwrap_or("");
    rest.contains('/')
}

/// Last non-empty segment of a URL path, so trailing slashes are ignored
/// (`/a/b/` → `b`). `None` for the root path.
pub fn basename_from_url_path(path: &str) -> Option<String> {
    let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
    Some(segment.to_string())
}

/// Lower-cased text after the last `.`; `None` when there is no dot or nothing follows it.
pub fn extension_of(basename: &str) -> Option<String> {
    let (_, ext) = basename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
