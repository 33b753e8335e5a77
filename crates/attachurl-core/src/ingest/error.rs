//! Per-URL and per-field ingestion failures.

use crate::url_model::UrlRejection;

/// Everything that can stop a URL from becoming an attachment. None of these
/// fail the request; the message text is what editors and the log see.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("{url} is not a valid URL.")]
    InvalidUrl { url: String },
    #[error("The URL {url} has no parsable path.")]
    NoParsablePath { url: String },
    #[error("The URL {url} has no parsable basename.")]
    NoParsableBasename { url: String },
    #[error("{extension} is not an allowed extension for field \"{field}\".")]
    DisallowedExtension { extension: String, field: String },
    #[error("No file could be downloaded from URL {url}")]
    DownloadFailed { url: String, reason: String },
    #[error("The MIME type \"{mime_type}\" of remote file {url} does not correspond with a valid file extension for field \"{field}\".")]
    MimeExtensionMismatch {
        mime_type: String,
        url: String,
        field: String,
    },
    /// Field is full; remaining URLs are not processed.
    #[error("Max file upload limit reached for field \"{field}\".")]
    CapacityExceeded { field: String },
    /// The whole field is skipped.
    #[error("You do not have permission to edit this field.")]
    PermissionDenied { field: String },
    /// The download could not be moved, inspected or converted locally.
    #[error("The file from URL {url} could not be stored: {reason}")]
    StorageFailed { url: String, reason: String },
}

impl IngestError {
    /// Whether this error ends processing for the whole field.
    pub fn is_field_level(&self) -> bool {
        matches!(
            self,
            IngestError::CapacityExceeded { .. } | IngestError::PermissionDenied { .. }
        )
    }
}

impl From<UrlRejection> for IngestError {
    fn from(r: UrlRejection) -> Self {
        match r {
            UrlRejection::InvalidUrl { url } => IngestError::InvalidUrl { url },
            UrlRejection::NoParsablePath { url } => IngestError::NoParsablePath { url },
            UrlRejection::NoParsableBasename { url } => IngestError::NoParsableBasename { url },
            UrlRejection::DisallowedExtension { extension, field } => {
                IngestError::DisallowedExtension { extension, field }
            }
        }
    }
}
