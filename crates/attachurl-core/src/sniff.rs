//! Content-based MIME detection for downloaded files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes inspected for magic numbers and text heuristics.
const SNIFF_LEN: usize = 8 * 1024;

const OCTET_STREAM: &str = "application/octet-stream";

/// Detects the MIME type of a file from its leading bytes.
///
/// Magic-byte detection first; SVG and plain text are recognized by content
/// since they carry no signature. Anything else is `application/octet-stream`.
pub fn detect_mime(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut buf = Vec::with_capacity(SNIFF_LEN);
    f.by_ref()
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut buf)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(detect_mime_bytes(&buf))
}

pub fn detect_mime_bytes(bytes: &[u8]) -> String {
    let detected = infer::get(bytes).map(|k| k.mime_type());
    match detected {
        Some(mime) if !is_xml(mime) => mime.to_string(),
        xml_or_unknown => {
            let text = match std::str::from_utf8(bytes) {
                Ok(text) => text,
                // The sample may end mid-character.
                Err(e) if e.error_len().is_none() => {
                    std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default()
                }
                Err(_) => return OCTET_STREAM.to_string(),
            };
            if text.contains("<svg") {
                "image/svg+xml".to_string()
            } else if let Some(mime) = xml_or_unknown {
                mime.to_string()
            } else if !bytes.is_empty() && !bytes.contains(&0) {
                "text/plain".to_string()
            } else {
                OCTET_STREAM.to_string()
            }
        }
    }
}

fn is_xml(mime: &str) -> bool {
    mime == "text/xml" || mime == "application/xml"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn magic_bytes() {
        assert_eq!(detect_mime_bytes(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), "image/png");
        assert_eq!(detect_mime_bytes(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]), "image/jpeg");
        assert_eq!(detect_mime_bytes(b"GIF89a\x01\x00\x01\x00"), "image/gif");
        assert_eq!(detect_mime_bytes(b"%PDF-1.7\n"), "application/pdf");
    }

    #[test]
    fn svg_by_content() {
        let svg = br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"/>"#;
        assert_eq!(detect_mime_bytes(svg), "image/svg+xml");
        assert_eq!(
            detect_mime_bytes(br#"<svg width="1" height="1"></svg>"#),
            "image/svg+xml"
        );
    }

    #[test]
    fn plain_text_and_binary() {
        assert_eq!(detect_mime_bytes(b"hello world\n"), "text/plain");
        assert_eq!(detect_mime_bytes(b"a\0b"), "application/octet-stream");
        assert_eq!(detect_mime_bytes(&[0xC3, 0x28, 0xA0]), "application/octet-stream");
        assert_eq!(detect_mime_bytes(b""), "application/octet-stream");
    }

    #[test]
    fn text_cut_mid_character() {
        assert_eq!(detect_mime_bytes(b"caf\xC3"), "text/plain");
    }

    #[test]
    fn detect_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"GIF87a\x01\x00\x01\x00").unwrap();
        f.flush().unwrap();
        assert_eq!(detect_mime(f.path()).unwrap(), "image/gif");
    }
}
