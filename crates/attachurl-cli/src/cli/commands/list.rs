//! `attachurl list <record> <field>` – show stored attachments.

use anyhow::Result;
use attachurl_core::model::RecordId;
use attachurl_core::store::AttachmentDb;

use super::resolve_target;

pub async fn run_list(db: &AttachmentDb, record_id: RecordId, field: &str) -> Result<()> {
    let (record, field) = resolve_target(db, record_id, field).await?;
    let collection = db.load_collection(record.id, &field.name).await?;
    if collection.is_empty() {
        println!("No attachments in field {}.", field.name);
        return Ok(());
    }
    println!("{:<32} {:<10} {:<11} {}", "FILE", "SIZE", "DIMENSIONS", "SOURCE");
    for a in collection.iter() {
        let dims = match (a.width, a.height) {
            (Some(w), Some(h)) => format!("{w}x{h}"),
            _ => "-".to_string(),
        };
        println!(
            "{:<32} {:<10} {:<11} {}",
            a.file_name,
            a.size,
            dims,
            a.source_url.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
