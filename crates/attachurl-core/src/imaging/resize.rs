//! Shrink-only resizing to a field's maximum width/height.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::ImageReader;
use std::path::Path;

/// Target `(width, height)` for an image of `width`x`height` under optional
/// field limits, or `None` when neither limit is exceeded. A 0 in the result
/// leaves that dimension unconstrained.
///
/// Only one bound is kept when the orientation makes the other redundant:
/// a landscape or square image with a width limit drops the height target,
/// a portrait image with a height limit drops the width target.
pub fn resize_targets(
    max_width: Option<u32>,
    max_height: Option<u32>,
    width: u32,
    height: u32,
) -> Option<(u32, u32)> {
    let max_width = max_width.filter(|w| *w > 0);
    let max_height = max_height.filter(|h| *h > 0);
    let too_wide = max_width.is_some_and(|m| m < width);
    let too_tall = max_height.is_some_and(|m| m < height);
    if !too_wide && !too_tall {
        return None;
    }

    let mut target_w = max_width.unwrap_or(0);
    let mut target_h = max_height.unwrap_or(0);
    if target_w > 0 && width >= height {
        target_h = 0;
    }
    if target_h > 0 && width < height {
        target_w = 0;
    }
    Some((target_w, target_h))
}

/// Final dimensions when fitting `width`x`height` inside the targets (0 =
/// unconstrained), keeping aspect ratio. `None` if that would not shrink it.
pub fn fit_within(width: u32, height: u32, target_w: u32, target_h: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let scale_w = (target_w > 0).then(|| target_w as f64 / width as f64);
    let scale_h = (target_h > 0).then(|| target_h as f64 / height as f64);
    let scale = match (scale_w, scale_h) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    if scale >= 1.0 {
        return None;
    }
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    Some((w, h))
}

/// Resizes an image file in place.
pub trait ImageResizer: Send + Sync {
    /// Shrinks the file at `path` to fit `width`x`height` (0 = unconstrained),
    /// never upscaling. Returns the resulting dimensions.
    fn resize(&self, path: &Path, width: u32, height: u32) -> Result<(u32, u32)>;
}

/// Resizer backed by the `image` crate; re-encodes in the file's own format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateResizer;

impl ImageResizer for ImageCrateResizer {
    fn resize(&self, path: &Path, width: u32, height: u32) -> Result<(u32, u32)> {
        let reader = ImageReader::open(path)
            .with_context(|| format!("open {}", path.display()))?
            .with_guessed_format()
            .with_context(|| format!("read {}", path.display()))?;
        let format = reader
            .format()
            .with_context(|| format!("unknown image format: {}", path.display()))?;
        let img = reader
            .decode()
            .with_context(|| format!("decode {}", path.display()))?;

        let Some((w, h)) = fit_within(img.width(), img.height(), width, height) else {
            return Ok((img.width(), img.height()));
        };
        let resized = img.resize_exact(w, h, FilterType::Lanczos3);
        resized
            .save_with_format(path, format)
            .with_context(|| format!("write {}", path.display()))?;
        tracing::debug!(path = %path.display(), from = ?(img.width(), img.height()), to = ?(w, h), "resized");
        Ok((w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_none_within_bounds() {
        assert_eq!(resize_targets(Some(800), Some(600), 640, 480), None);
        assert_eq!(resize_targets(None, None, 5000, 5000), None);
        assert_eq!(resize_targets(Some(0), Some(0), 5000, 5000), None);
    }

    #[test]
    fn landscape_width_bound_drops_height() {
        assert_eq!(resize_targets(Some(800), Some(600), 1600, 800), Some((800, 0)));
        assert_eq!(resize_targets(Some(800), Some(600), 1000, 1000), Some((800, 0)));
    }

    #[test]
    fn portrait_height_bound_drops_width() {
        assert_eq!(resize_targets(Some(800), Some(600), 700, 1400), Some((0, 600)));
        assert_eq!(resize_targets(None, Some(600), 700, 1400), Some((0, 600)));
    }

    #[test]
    fn single_limit() {
        assert_eq!(resize_targets(Some(800), None, 1200, 1600), Some((800, 0)));
        assert_eq!(resize_targets(None, Some(600), 1600, 800), Some((0, 600)));
    }

    #[test]
    fn fit_within_keeps_aspect_and_never_upscales() {
        assert_eq!(fit_within(1600, 800, 800, 0), Some((800, 400)));
        assert_eq!(fit_within(700, 1400, 0, 600), Some((300, 600)));
        assert_eq!(fit_within(1600, 1200, 800, 300), Some((400, 300)));
        assert_eq!(fit_within(400, 200, 800, 0), None);
        assert_eq!(fit_within(400, 200, 0, 0), None);
    }

    #[test]
    fn image_crate_resizer_shrinks_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbImage::new(1600, 800).save(&path).unwrap();

        let (tw, th) = resize_targets(Some(800), Some(600), 1600, 800).unwrap();
        let dims = ImageCrateResizer.resize(&path, tw, th).unwrap();
        assert_eq!(dims, (800, 400));
        assert_eq!(image::image_dimensions(&path).unwrap(), (800, 400));
    }

    #[test]
    fn image_crate_resizer_leaves_small_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        image::RgbImage::new(100, 50).save(&path).unwrap();
        let before = std::fs::read(&path).unwrap();
        assert_eq!(ImageCrateResizer.resize(&path, 800, 0).unwrap(), (100, 50));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
