//! `attachurl add` and `attachurl add-json` – programmatic ingestion.

use anyhow::Result;
use attachurl_core::config::AttachConfig;
use attachurl_core::entry::{add_from_url, UrlInput};
use attachurl_core::ingest::Ingestor;
use attachurl_core::model::RecordId;
use attachurl_core::store::AttachmentDb;

use super::{print_report, resolve_target};

pub async fn run_add(
    db: &AttachmentDb,
    cfg: &AttachConfig,
    record_id: RecordId,
    field: &str,
    urls: Vec<String>,
) -> Result<()> {
    let input = match <[String; 1]>::try_from(urls) {
        Ok([one]) => UrlInput::One(one),
        Err(many) => UrlInput::Many(many),
    };
    ingest(db, cfg, record_id, field, input).await
}

pub async fn run_add_json(
    db: &AttachmentDb,
    cfg: &AttachConfig,
    record_id: RecordId,
    field: &str,
    json: &str,
) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let input = UrlInput::try_from(value)?;
    ingest(db, cfg, record_id, field, input).await
}

async fn ingest(
    db: &AttachmentDb,
    cfg: &AttachConfig,
    record_id: RecordId,
    field: &str,
    input: UrlInput,
) -> Result<()> {
    let (record, field) = resolve_target(db, record_id, field).await?;
    let ingestor = Ingestor::from_config(cfg)?;
    match add_from_url(&ingestor, db, &record, &field, input).await? {
        Some(report) => print_report(&report),
        None => println!("Nothing to add."),
    }
    Ok(())
}
