//! Blocking per-URL work: download, type check, rename, convert, relocate, resize.

use std::path::{Path, PathBuf};

use super::{IngestError, Ingestor};
use crate::imaging;
use crate::model::{Attachment, AttachmentField, FieldKind};
use crate::sniff;
use crate::store::files;
use crate::url_model::{local_file_name, ParsedUrl};

/// An attachment ready to join the collection.
pub(super) struct Staged {
    pub attachment: Attachment,
    pub downloaded_bytes: u64,
    /// Name the file would have had without a collision suffix.
    pub wanted_name: String,
}

impl Ingestor {
    /// Turns a validated URL into an attachment in `files_dir`. Temp files are
    /// left in `session_dir` on failure; the session directory owns them.
    pub(super) fn stage(
        &self,
        parsed: &ParsedUrl,
        field: &AttachmentField,
        session_dir: &Path,
        files_dir: &Path,
    ) -> Result<Staged, IngestError> {
        let url = parsed.url.as_str();
        let fetched = self
            .downloader
            .fetch(url, session_dir, &local_file_name(&parsed.basename))
            .map_err(|e| {
                tracing::debug!(url, field = %field.name, "download failed: {}", e);
                IngestError::DownloadFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            })?;

        let mime_type = sniff::detect_mime(&fetched.path).map_err(|e| storage_failed(url, e))?;
        let mime_extension = self
            .mime_map
            .lookup(&mime_type)
            .map(str::to_ascii_lowercase)
            .filter(|ext| field.extensions.contains(ext))
            .ok_or_else(|| IngestError::MimeExtensionMismatch {
                mime_type: mime_type.clone(),
                url: url.to_string(),
                field: field.name.clone(),
            })?;

        let mut local = fetched.path.clone();
        if parsed.extension.is_none() {
            local = append_extension(&local, &mime_extension);
            std::fs::rename(&fetched.path, &local).map_err(|e| storage_failed(url, e.into()))?;
        }

        for ext in parsed.extension.iter().chain(std::iter::once(&mime_extension)) {
            if let Some(converter) = self.converters.find(ext) {
                local = converter.convert(&local).map_err(|e| storage_failed(url, e))?;
                tracing::debug!(url, ext = %ext, to = %local.display(), "converted");
                break;
            }
        }

        let wanted_name = local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = files::import_file(&local, files_dir).map_err(|e| storage_failed(url, e))?;
        let mut attachment = Attachment {
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size: file_size(&path),
            path,
            width: None,
            height: None,
            source_url: Some(url.to_string()),
        };

        if field.kind == FieldKind::Image {
            self.apply_image_limits(&mut attachment, field);
        }

        Ok(Staged {
            attachment,
            downloaded_bytes: fetched.bytes,
            wanted_name,
        })
    }

    /// Records dimensions and shrinks the file if it exceeds the field's limits.
    fn apply_image_limits(&self, attachment: &mut Attachment, field: &AttachmentField) {
        let Some((width, height)) = imaging::dimensions(&attachment.path) else {
            return;
        };
        attachment.width = Some(width);
        attachment.height = Some(height);

        let Some((target_w, target_h)) =
            imaging::resize_targets(field.max_width, field.max_height, width, height)
        else {
            return;
        };
        match self.resizer.resize(&attachment.path, target_w, target_h) {
            Ok((w, h)) => {
                attachment.width = Some(w);
                attachment.height = Some(h);
                attachment.size = file_size(&attachment.path);
            }
            Err(e) => {
                tracing::warn!(path = %attachment.path.display(), field = %field.name, "resize failed: {:#}", e);
            }
        }
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(ext);
    PathBuf::from(s)
}

fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn storage_failed(url: &str, e: anyhow::Error) -> IngestError {
    IngestError::StorageFailed {
        url: url.to_string(),
        reason: format!("{:#}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_extension_keeps_existing_name() {
        assert_eq!(
            append_extension(Path::new("/tmp/s/abc123"), "jpg"),
            PathBuf::from("/tmp/s/abc123.jpg")
        );
        assert_eq!(
            append_extension(Path::new("/tmp/s/v1.2"), "png"),
            PathBuf::from("/tmp/s/v1.2.png")
        );
    }
}
