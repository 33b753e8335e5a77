//! `attachurl submit <key>` – process a URL textarea as the record-edit form does.

use anyhow::{Context, Result};
use attachurl_core::config::AttachConfig;
use attachurl_core::entry::{process_form, EditContext};
use attachurl_core::ingest::Ingestor;
use attachurl_core::permission::RoleAccess;
use attachurl_core::store::AttachmentDb;
use std::io::Read;

use super::print_report;

pub async fn run_submit(
    db: &AttachmentDb,
    cfg: &AttachConfig,
    key: &str,
    roles: Vec<String>,
    superuser: bool,
) -> Result<()> {
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("read textarea from stdin")?;

    let access = if superuser {
        RoleAccess::superuser()
    } else {
        RoleAccess::editor(roles)
    };
    let ingestor = Ingestor::from_config(cfg)?;
    let pairs = [(key.to_string(), body)];
    let outcome = process_form(&ingestor, db, &access, &EditContext::record_edit(), &pairs).await?;

    for notice in &outcome.notices {
        eprintln!("{notice}");
    }
    for report in &outcome.reports {
        print_report(report);
    }
    if outcome.reports.is_empty() && outcome.denied.is_empty() && outcome.notices.is_empty() {
        println!("No URL input found for key {key}.");
    }
    if let Some(target) = outcome.failed.first() {
        anyhow::bail!(
            "field {} on record {} could not be saved",
            target.field_name,
            target.record_id
        );
    }
    Ok(())
}
