//! `attachurl record add|show`.

use anyhow::{Context, Result};
use attachurl_core::model::{ContainerRef, RecordId};
use attachurl_core::store::AttachmentDb;

pub async fn run_record_add(db: &AttachmentDb, container: Option<(RecordId, String)>) -> Result<()> {
    let container = match container {
        Some((record_id, field)) => {
            db.get_record(record_id)
                .await?
                .with_context(|| format!("container record {record_id} does not exist"))?;
            Some(ContainerRef { record_id, field })
        }
        None => None,
    };
    let id = db.add_record(container.as_ref()).await?;
    match &container {
        Some(c) => println!("Added record {id} in {}.{}", c.record_id, c.field),
        None => println!("Added record {id}"),
    }
    Ok(())
}

pub async fn run_record_show(db: &AttachmentDb, id: RecordId) -> Result<()> {
    let record = db
        .get_record(id)
        .await?
        .with_context(|| format!("record {id} does not exist"))?;
    println!("record {}", record.id);
    if let Some(c) = &record.container {
        println!("  nested in record {} field {}", c.record_id, c.field);
    }
    for field in db.list_fields().await? {
        let collection = db.load_collection(record.id, &field.name).await?;
        if !collection.is_empty() {
            println!("  {:<24} {} attachment(s)", field.name, collection.len());
        }
    }
    Ok(())
}
