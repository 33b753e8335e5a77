//! MIME type to file extension table.
//!
//! Parsed from configurable text, one `mimeType:extension` per line.

/// Built-in mappings used when the config doesn't override them.
pub const DEFAULT_MIME_TYPES: &str = "text/plain:txt
application/pdf:pdf
application/msword:docx
application/excel:xlsx
application/rtf:rtf
image/gif:gif
image/jpeg:jpg
image/png:png
image/svg+xml:svg
image/webp:webp";

/// Ordered `(mime type, extension)` pairs. A later line for the same MIME type
/// replaces the earlier one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeMapping {
    entries: Vec<(String, String)>,
}

impl MimeMapping {
    /// Parse mapping text. Lines without a `:` are skipped; only the first `:`
    /// splits, so the extension side may itself contain colons.
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for line in text.split(['\r', '\n']).filter(|l| !l.is_empty()) {
            let Some((mime, ext)) = line.split_once(':') else {
                continue;
            };
            match entries.iter_mut().find(|(m, _)| m == mime) {
                Some(existing) => existing.1 = ext.to_string(),
                None => entries.push((mime.to_string(), ext.to_string())),
            }
        }
        Self { entries }
    }

    /// Exact, case-sensitive match on the MIME type as authored.
    pub fn lookup(&self, mime_type: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(m, _)| m == mime_type)
            .map(|(_, e)| e.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(m, e)| (m.as_str(), e.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
