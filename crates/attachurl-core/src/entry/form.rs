//! Interactive entry point: URL textareas submitted with the record-edit form.
//!
//! Each textarea is named `urlUpload*<field>*<record id>` and holds one URL per line.

use anyhow::Result;

use crate::ingest::{IngestError, IngestReport, Ingestor};
use crate::model::RecordId;
use crate::notice::{Notice, Notices, Origin};
use crate::permission::{EditAccess, EditPermissionGate};
use crate::store::AttachmentDb;

/// Prefix of textarea names carrying URLs.
pub const FORM_KEY_PREFIX: &str = "urlUpload";

/// Name of the main record-edit form; other forms are ignored.
pub const EDIT_FORM_NAME: &str = "record-edit";

/// The submitting form and editor, as reported by the host.
#[derive(Debug, Clone)]
pub struct EditContext {
    pub form_name: String,
    /// Set by hosts for editor contexts that must not take URL uploads
    /// (profile editors, bulk listers, ...).
    pub excluded_editor: bool,
}

impl EditContext {
    pub fn record_edit() -> Self {
        Self {
            form_name: EDIT_FORM_NAME.to_string(),
            excluded_editor: false,
        }
    }

    fn accepts_uploads(&self) -> bool {
        self.form_name == EDIT_FORM_NAME && !self.excluded_editor
    }
}

/// Field and record decoded from a textarea name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTarget {
    pub field_name: String,
    pub record_id: RecordId,
}

/// Reports for every field processed, plus notices for the editor.
#[derive(Debug, Default)]
pub struct FormOutcome {
    pub reports: Vec<IngestReport>,
    /// Targets skipped for lack of permission.
    pub denied: Vec<FormTarget>,
    /// Targets abandoned because the store failed; other keys still ran.
    pub failed: Vec<FormTarget>,
    pub notices: Vec<Notice>,
}

/// What happened to one textarea.
enum KeyResult {
    Ingested(IngestReport),
    Denied,
    Skipped,
}

/// Decodes `urlUpload*<field>*<record id>`. Extra `*` parts are ignored.
/// `None` when the prefix is missing, the field name sanitizes to nothing or
/// the id isn't a positive integer.
pub fn parse_form_key(key: &str) -> Option<FormTarget> {
    if !key.starts_with(FORM_KEY_PREFIX) {
        return None;
    }
    let mut parts = key.split('*').skip(1);
    let field_name = sanitize_field_name(parts.next()?);
    let record_id: RecordId = parts.next()?.trim().parse().ok()?;
    if field_name.is_empty() || record_id < 1 {
        return None;
    }
    Some(FormTarget {
        field_name,
        record_id,
    })
}

/// Keeps ASCII letters, digits and `_`.
pub fn sanitize_field_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Splits textarea content on `\r\n`, `\n` or `\r`, dropping blank lines.
pub fn split_urls(value: &str) -> Vec<String> {
    value
        .split("\r\n")
        .flat_map(|chunk| chunk.split(['\n', '\r']))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Processes every non-empty URL textarea in a submitted form, one field at a time.
///
/// A store failure on one textarea becomes an error notice for that target;
/// the remaining textareas are still processed.
pub async fn process_form<A: EditAccess + ?Sized>(
    ingestor: &Ingestor,
    db: &AttachmentDb,
    access: &A,
    ctx: &EditContext,
    pairs: &[(String, String)],
) -> Result<FormOutcome> {
    let mut outcome = FormOutcome::default();
    if !ctx.accepts_uploads() {
        tracing::debug!(form = %ctx.form_name, excluded = ctx.excluded_editor, "form ignored");
        return Ok(outcome);
    }

    let mut notices = Notices::new(Origin::Interactive);
    let gate = EditPermissionGate::new(access);

    for (key, value) in pairs {
        if !key.starts_with(FORM_KEY_PREFIX) || value.trim().is_empty() {
            continue;
        }
        let Some(target) = parse_form_key(key) else {
            tracing::debug!(key = %key, "malformed URL upload key");
            continue;
        };

        match process_key(ingestor, db, &gate, &target, value, &mut notices).await {
            Ok(KeyResult::Ingested(report)) => outcome.reports.push(report),
            Ok(KeyResult::Denied) => outcome.denied.push(target),
            Ok(KeyResult::Skipped) => {}
            Err(e) => {
                tracing::error!(
                    record = target.record_id,
                    field = %target.field_name,
                    "URL upload failed: {:#}",
                    e
                );
                notices.error(format!(
                    "URLs for field \"{}\" could not be saved: {:#}",
                    target.field_name, e
                ));
                outcome.failed.push(target);
            }
        }
    }

    outcome.notices = notices.into_user_notices();
    Ok(outcome)
}

async fn process_key<A: EditAccess + ?Sized>(
    ingestor: &Ingestor,
    db: &AttachmentDb,
    gate: &EditPermissionGate<'_, A>,
    target: &FormTarget,
    value: &str,
    notices: &mut Notices,
) -> Result<KeyResult> {
    let Some(record) = db.get_record(target.record_id).await? else {
        notices.error(format!("Record {} does not exist.", target.record_id));
        return Ok(KeyResult::Skipped);
    };
    let Some(field) = db.get_field(&target.field_name).await? else {
        notices.error(format!("Field \"{}\" does not exist.", target.field_name));
        return Ok(KeyResult::Skipped);
    };
    let container_field = match &record.container {
        Some(c) => db.get_field(&c.field).await?,
        None => None,
    };

    if !gate.can_edit(&record, &field, container_field.as_ref()) {
        let err = IngestError::PermissionDenied {
            field: field.name.clone(),
        };
        notices.error(err.to_string());
        return Ok(KeyResult::Denied);
    }

    let urls = split_urls(value);
    let report = ingestor
        .ingest(db, &record, &field, &urls, notices)
        .await?;
    Ok(KeyResult::Ingested(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key() {
        assert_eq!(
            parse_form_key("urlUpload*images*42"),
            Some(FormTarget {
                field_name: "images".to_string(),
                record_id: 42
            })
        );
        assert_eq!(
            parse_form_key("urlUpload*hero-image!*7*extra").map(|t| t.field_name),
            Some("heroimage".to_string())
        );
    }

    #[test]
    fn parse_key_rejects_malformed() {
        assert_eq!(parse_form_key("title"), None);
        assert_eq!(parse_form_key("urlUpload*images"), None);
        assert_eq!(parse_form_key("urlUpload*images*0"), None);
        assert_eq!(parse_form_key("urlUpload*images*-3"), None);
        assert_eq!(parse_form_key("urlUpload*images*abc"), None);
        assert_eq!(parse_form_key("urlUpload*!!*3"), None);
    }

    #[test]
    fn split_mixed_line_endings() {
        let v = "https://a.com/1.jpg\r\nhttps://a.com/2.jpg\nhttps://a.com/3.jpg\rhttps://a.com/4.jpg\n\n  \n";
        assert_eq!(
            split_urls(v),
            [
                "https://a.com/1.jpg",
                "https://a.com/2.jpg",
                "https://a.com/3.jpg",
                "https://a.com/4.jpg"
            ]
        );
    }

    #[test]
    fn context_gate() {
        assert!(EditContext::record_edit().accepts_uploads());
        let other = EditContext {
            form_name: "profile".to_string(),
            excluded_editor: false,
        };
        assert!(!other.accepts_uploads());
        let excluded = EditContext {
            excluded_editor: true,
            ..EditContext::record_edit()
        };
        assert!(!excluded.accepts_uploads());
    }
}
