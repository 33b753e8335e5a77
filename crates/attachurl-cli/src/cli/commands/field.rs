//! `attachurl field set|list`.

use anyhow::Result;
use attachurl_core::model::{AllowedExtensions, AttachmentField, FieldKind};
use attachurl_core::store::AttachmentDb;

/// Field definition as given on the command line.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub extensions: String,
    pub max_files: u32,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub edit_roles: Vec<String>,
}

impl From<FieldSpec> for AttachmentField {
    fn from(s: FieldSpec) -> Self {
        AttachmentField {
            name: s.name,
            kind: s.kind,
            max_files: s.max_files,
            extensions: AllowedExtensions::parse(&s.extensions),
            max_width: s.max_width.filter(|w| *w > 0),
            max_height: s.max_height.filter(|h| *h > 0),
            use_roles: !s.edit_roles.is_empty(),
            edit_roles: s.edit_roles,
        }
    }
}

pub async fn run_field_set(db: &AttachmentDb, spec: FieldSpec) -> Result<()> {
    let field = AttachmentField::from(spec);
    db.put_field(&field).await?;
    println!("Saved field {} ({})", field.name, field.kind.as_str());
    Ok(())
}

pub async fn run_field_list(db: &AttachmentDb) -> Result<()> {
    let fields = db.list_fields().await?;
    if fields.is_empty() {
        println!("No fields defined.");
        return Ok(());
    }
    println!(
        "{:<24} {:<6} {:<6} {:<12} {}",
        "NAME", "KIND", "MAX", "LIMITS", "EXTENSIONS"
    );
    for f in fields {
        let max = match f.max_files {
            0 => "-".to_string(),
            n => n.to_string(),
        };
        let limits = match (f.max_width, f.max_height) {
            (None, None) => "-".to_string(),
            (w, h) => format!(
                "{}x{}",
                w.map_or("*".to_string(), |v| v.to_string()),
                h.map_or("*".to_string(), |v| v.to_string())
            ),
        };
        println!(
            "{:<24} {:<6} {:<6} {:<12} {}",
            f.name,
            f.kind.as_str(),
            max,
            limits,
            f.extensions.to_list()
        );
    }
    Ok(())
}
