//! CLI command handlers, one file per command group.

mod add;
mod completions;
mod field;
mod list;
mod mime;
mod record;
mod submit;

pub use add::{run_add, run_add_json};
pub use completions::run_completions;
pub use field::{run_field_list, run_field_set, FieldSpec};
pub use list::run_list;
pub use mime::run_mime;
pub use record::{run_record_add, run_record_show};
pub use submit::run_submit;

use anyhow::{Context, Result};
use attachurl_core::ingest::IngestReport;
use attachurl_core::model::{AttachmentField, Record, RecordId};
use attachurl_core::store::AttachmentDb;

/// Looks up a record and field, failing with a readable message if either is missing.
async fn resolve_target(
    db: &AttachmentDb,
    record_id: RecordId,
    field: &str,
) -> Result<(Record, AttachmentField)> {
    let record = db
        .get_record(record_id)
        .await?
        .with_context(|| format!("record {record_id} does not exist"))?;
    let field = db
        .get_field(field)
        .await?
        .with_context(|| format!("field \"{field}\" does not exist"))?;
    Ok((record, field))
}

fn print_report(report: &IngestReport) {
    for a in &report.accepted {
        println!(
            "added   {}  ->  {} ({} bytes)",
            a.url,
            a.attachment.file_name,
            a.attachment.size
        );
    }
    for r in &report.rejected {
        println!("skipped {}  ({})", r.url, r.error);
    }
    println!(
        "record {} field {}: {} added, {} skipped",
        report.record_id,
        report.field,
        report.accepted.len(),
        report.rejected.len()
    );
}
