//! Record and field definition operations.

use anyhow::Result;
use sqlx::Row;

use super::db::{unix_timestamp, AttachmentDb};
use crate::model::{AllowedExtensions, AttachmentField, ContainerRef, FieldKind, Record, RecordId};

impl AttachmentDb {
    /// Insert a new record, optionally nested in another record's container field.
    pub async fn add_record(&self, container: Option<&ContainerRef>) -> Result<RecordId> {
        let id = sqlx::query(
            r#"
            INSERT INTO records (container_record_id, container_field, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(container.map(|c| c.record_id))
        .bind(container.map(|c| c.field.as_str()))
        .bind(unix_timestamp())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    pub async fn get_record(&self, id: RecordId) -> Result<Option<Record>> {
        let row = sqlx::query(
            r#"
            SELECT id, container_record_id, container_field
            FROM records
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let container_record_id: Option<i64> = row.get("container_record_id");
        let container_field: Option<String> = row.get("container_field");
        let container = match (container_record_id, container_field) {
            (Some(record_id), Some(field)) => Some(ContainerRef { record_id, field }),
            _ => None,
        };
        Ok(Some(Record {
            id: row.get("id"),
            container,
        }))
    }

    /// Create or replace a field definition.
    pub async fn put_field(&self, field: &AttachmentField) -> Result<()> {
        let roles_json = serde_json::to_string(&field.edit_roles)?;
        sqlx::query(
            r#"
            INSERT INTO fields (
                name, kind, max_files, extensions, max_width, max_height, use_roles, edit_roles
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(name) DO UPDATE SET
                kind = excluded.kind,
                max_files = excluded.max_files,
                extensions = excluded.extensions,
                max_width = excluded.max_width,
                max_height = excluded.max_height,
                use_roles = excluded.use_roles,
                edit_roles = excluded.edit_roles
            "#,
        )
        .bind(&field.name)
        .bind(field.kind.as_str())
        .bind(field.max_files as i64)
        .bind(field.extensions.to_list())
        .bind(field.max_width.map(i64::from))
        .bind(field.max_height.map(i64::from))
        .bind(field.use_roles)
        .bind(roles_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_field(&self, name: &str) -> Result<Option<AttachmentField>> {
        let row = sqlx::query(
            r#"
            SELECT name, kind, max_files, extensions, max_width, max_height, use_roles, edit_roles
            FROM fields
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| field_from_row(&r)).transpose()
    }

    pub async fn list_fields(&self) -> Result<Vec<AttachmentField>> {
        let rows = sqlx::query(
            r#"
            SELECT name, kind, max_files, extensions, max_width, max_height, use_roles, edit_roles
            FROM fields
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(field_from_row).collect()
    }
}

fn field_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttachmentField> {
    let kind: String = row.get("kind");
    let max_files: i64 = row.get("max_files");
    let extensions: String = row.get("extensions");
    let max_width: Option<i64> = row.get("max_width");
    let max_height: Option<i64> = row.get("max_height");
    let roles_json: String = row.get("edit_roles");
    Ok(AttachmentField {
        name: row.get("name"),
        kind: FieldKind::from_str(&kind),
        max_files: u32::try_from(max_files).unwrap_or(0),
        extensions: AllowedExtensions::parse(&extensions),
        max_width: max_width.and_then(|w| u32::try_from(w).ok()),
        max_height: max_height.and_then(|h| u32::try_from(h).ok()),
        use_roles: row.get("use_roles"),
        edit_roles: serde_json::from_str(&roles_json)?,
    })
}
