//! Optional format converters applied to downloads before they are attached.

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::ImageReader;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Rewrites a downloaded file into another format.
pub trait FormatConverter: Send + Sync {
    /// Lower-case extension this converter accepts (e.g. `webp`).
    fn source_extension(&self) -> &str;

    /// Converts the file at `path`, returning the path of the replacement.
    /// The original is removed.
    fn convert(&self, path: &Path) -> Result<PathBuf>;
}

/// Re-encodes WebP images as JPEG (`photo.webp` → `photo.jpg`).
#[derive(Debug, Clone, Copy)]
pub struct WebpToJpeg {
    pub quality: u8,
}

impl Default for WebpToJpeg {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

impl FormatConverter for WebpToJpeg {
    fn source_extension(&self) -> &str {
        "webp"
    }

    fn convert(&self, path: &Path) -> Result<PathBuf> {
        let img = ImageReader::open(path)
            .with_context(|| format!("open {}", path.display()))?
            .with_guessed_format()?
            .decode()
            .with_context(|| format!("decode {}", path.display()))?;

        let out_path = path.with_extension("jpg");
        let out = File::create(&out_path)
            .with_context(|| format!("create {}", out_path.display()))?;
        let encoder = JpegEncoder::new_with_quality(BufWriter::new(out), self.quality);
        img.to_rgb8()
            .write_with_encoder(encoder)
            .with_context(|| format!("encode {}", out_path.display()))?;

        if out_path != path {
            std::fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
        }
        Ok(out_path)
    }
}

/// Registered converters, looked up by source extension. Empty by default.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn FormatConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, converter: Arc<dyn FormatConverter>) {
        self.converters.push(converter);
    }

    pub fn find(&self, extension: &str) -> Option<&dyn FormatConverter> {
        self.converters
            .iter()
            .find(|c| c.source_extension().eq_ignore_ascii_case(extension))
            .map(|c| c.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.converters.iter().map(|c| c.source_extension()))
            .finish()
    }
}
