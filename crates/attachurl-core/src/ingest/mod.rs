//! URL-to-attachment ingestion for one record field.
//!
//! For each URL in order: capacity check, validation, download into a
//! per-session temp dir, MIME/extension reconciliation, optional conversion,
//! relocation into permanent storage and resize. Accepted attachments join the
//! in-memory collection, which is saved once when the loop ends. Files moved
//! into storage only count once that save commits; on any error they are
//! deleted again.

mod error;
mod report;
mod stage;

pub use error::IngestError;
pub use report::{Accepted, IngestReport, Rejected};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::AttachConfig;
use crate::downloader::Downloader;
use crate::imaging::{ConverterRegistry, FormatConverter, ImageCrateResizer, ImageResizer, WebpToJpeg};
use crate::mime_map::MimeMapping;
use crate::model::{AttachmentCollection, AttachmentField, Record};
use crate::notice::Notices;
use crate::store::{files, AttachmentDb};
use crate::url_model;

use stage::Staged;

/// Prefix of the per-session temporary download directory.
const SESSION_PREFIX: &str = "attachurl-";

/// Shared pipeline configuration. Cheap to clone; each URL's blocking work
/// runs on a clone.
#[derive(Clone)]
pub struct Ingestor {
    downloader: Downloader,
    mime_map: Arc<MimeMapping>,
    resizer: Arc<dyn ImageResizer>,
    converters: ConverterRegistry,
    storage_dir: PathBuf,
    /// Parent of session dirs; the system temp dir when unset.
    temp_root: Option<PathBuf>,
}

/// Mutable state of one ingestion call.
struct Batch {
    collection: AttachmentCollection,
    report: IngestReport,
    imported: Imported,
}

/// Files moved into permanent storage during one ingestion call.
#[derive(Debug, Default)]
struct Imported {
    paths: Vec<PathBuf>,
    /// Single-slot replacement stored under a suffixed name that should take
    /// over the replaced file's name once the save commits: (current, target).
    reclaim: Option<(PathBuf, PathBuf)>,
}

impl Imported {
    /// Deletes everything imported so far; nothing references it.
    async fn discard(&self) {
        for path in &self.paths {
            files::remove_quietly(path).await;
        }
    }

    /// Moves a single-slot replacement onto the name of the file it replaced.
    async fn finish_reclaim(&self) {
        let Some((from, to)) = &self.reclaim else {
            return;
        };
        if let Err(e) = tokio::fs::rename(from, to).await {
            tracing::error!(
                from = %from.display(),
                to = %to.display(),
                "could not move replacement onto stored name: {}",
                e
            );
        }
    }
}

impl Ingestor {
    pub fn new(downloader: Downloader, mime_map: MimeMapping, storage_dir: PathBuf) -> Self {
        Self {
            downloader,
            mime_map: Arc::new(mime_map),
            resizer: Arc::new(ImageCrateResizer),
            converters: ConverterRegistry::new(),
            storage_dir,
            temp_root: None,
        }
    }

    /// Builds the pipeline from config; registers WebP→JPEG when `convert_webp` is set.
    pub fn from_config(cfg: &AttachConfig) -> Result<Self> {
        let mut ingestor = Self::new(
            Downloader::from_config(cfg),
            MimeMapping::parse(&cfg.mime_types),
            cfg.resolve_storage_dir()?,
        );
        if cfg.convert_webp {
            ingestor = ingestor.with_converter(Arc::new(WebpToJpeg::default()));
        }
        Ok(ingestor)
    }

    pub fn with_resizer(mut self, resizer: Arc<dyn ImageResizer>) -> Self {
        self.resizer = resizer;
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn FormatConverter>) -> Self {
        self.converters.register(converter);
        self
    }

    /// Create session dirs under `root` instead of the system temp dir.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn mime_map(&self) -> &MimeMapping {
        &self.mime_map
    }

    /// Adds the given URLs to `field` on `record` and saves the field once.
    ///
    /// Per-URL problems become notices and report entries; only store and
    /// temp-dir failures are returned as errors, after deleting the files
    /// this call imported. A single-slot field is cleared lazily, on the
    /// first URL that succeeds.
    pub async fn ingest(
        &self,
        db: &AttachmentDb,
        record: &Record,
        field: &AttachmentField,
        urls: &[String],
        notices: &mut Notices,
    ) -> Result<IngestReport> {
        let mut batch = Batch {
            collection: db.load_collection(record.id, &field.name).await?,
            report: IngestReport::new(record.id, &field.name),
            imported: Imported::default(),
        };

        // Removed on drop, whichever way this function returns.
        let mut builder = tempfile::Builder::new();
        builder.prefix(SESSION_PREFIX);
        let session = match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .context("create download session dir")?;

        let outcome = self
            .ingest_urls(record, field, urls, session.path(), &mut batch, notices)
            .await;
        let saved = match outcome {
            Ok(()) => db.save_field(record.id, &field.name, &batch.collection).await,
            Err(e) => Err(e),
        };
        if let Err(e) = saved {
            batch.imported.discard().await;
            return Err(e);
        }

        batch.imported.finish_reclaim().await;
        batch.report.saved = true;
        Ok(batch.report)
    }

    async fn ingest_urls(
        &self,
        record: &Record,
        field: &AttachmentField,
        urls: &[String],
        session_dir: &Path,
        batch: &mut Batch,
        notices: &mut Notices,
    ) -> Result<()> {
        let Batch {
            collection,
            report,
            imported,
        } = batch;
        let mut remaining = field.remaining_slots(collection.len());
        let files_dir = files::record_dir(&self.storage_dir, record.id);

        tracing::debug!(
            record = record.id,
            field = %field.name,
            urls = urls.len(),
            existing = collection.len(),
            remaining,
            "ingest start"
        );

        for (i, raw) in urls.iter().enumerate() {
            let url = raw.trim();

            if remaining < 1 {
                let err = IngestError::CapacityExceeded {
                    field: field.name.clone(),
                };
                notices.warning(err.to_string());
                report.capacity_reached = true;
                for rest in &urls[i..] {
                    report.reject(rest.trim(), err.clone());
                }
                break;
            }

            let parsed = match url_model::validate(url, &field.name, &field.extensions) {
                Ok(p) => p,
                Err(rejection) => {
                    let err = IngestError::from(rejection);
                    notices.error(err.to_string());
                    report.reject(url, err);
                    continue;
                }
            };

            let staged = tokio::task::spawn_blocking({
                let this = self.clone();
                let field = field.clone();
                let session_dir = session_dir.to_path_buf();
                let files_dir = files_dir.clone();
                move || this.stage(&parsed, &field, &session_dir, &files_dir)
            })
            .await
            .context("download task join")?;

            let Staged {
                mut attachment,
                downloaded_bytes,
                wanted_name,
            } = match staged {
                Ok(s) => s,
                Err(err) => {
                    notices.error(err.to_string());
                    report.reject(url, err);
                    continue;
                }
            };
            imported.paths.push(attachment.path.clone());

            if field.is_single() && !collection.is_empty() {
                collection.remove_all();
                let wanted = files_dir.join(&wanted_name);
                if wanted != attachment.path && collection.removed().iter().any(|r| r.path == wanted) {
                    imported.reclaim = Some((attachment.path.clone(), wanted.clone()));
                    attachment.path = wanted;
                    attachment.file_name = wanted_name;
                }
            }
            tracing::info!(
                record = record.id,
                field = %field.name,
                url,
                file = %attachment.file_name,
                "attached"
            );
            collection.add(attachment.clone());
            report.accepted.push(Accepted {
                url: url.to_string(),
                attachment,
                downloaded_bytes,
            });
            remaining -= 1;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("downloader", &self.downloader)
            .field("mime_types", &self.mime_map.len())
            .field("converters", &self.converters)
            .field("storage_dir", &self.storage_dir)
            .field("temp_root", &self.temp_root)
            .finish()
    }
}
