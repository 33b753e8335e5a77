//! Image capabilities used by image fields: dimension probing, bounded
//! resizing and pluggable format conversion.

mod convert;
mod resize;

pub use convert::{ConverterRegistry, FormatConverter, WebpToJpeg};
pub use resize::{fit_within, resize_targets, ImageCrateResizer, ImageResizer};

use std::path::Path;

/// Pixel dimensions from the file's header, sniffing the format from content.
/// `None` when the decoder doesn't recognize the file (e.g. SVG).
pub fn dimensions(path: &Path) -> Option<(u32, u32)> {
    let reader = image::ImageReader::open(path).ok()?;
    let reader = reader.with_guessed_format().ok()?;
    match reader.into_dimensions() {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::debug!(path = %path.display(), "no image dimensions: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_ignore_misleading_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        image::RgbImage::new(12, 7).save(&png).unwrap();
        let disguised = dir.path().join("disguised.jpg");
        std::fs::copy(&png, &disguised).unwrap();
        assert_eq!(dimensions(&png), Some((12, 7)));
        assert_eq!(dimensions(&disguised), Some((12, 7)));
    }

    #[test]
    fn dimensions_none_for_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "hello").unwrap();
        assert_eq!(dimensions(&txt), None);
        assert_eq!(dimensions(&dir.path().join("missing.png")), None);
    }
}
