//! Attachment collections: load before ingestion, save once after.

use anyhow::Result;
use sqlx::Row;
use std::path::PathBuf;

use super::db::{unix_timestamp, AttachmentDb};
use super::files;
use crate::model::{Attachment, AttachmentCollection, RecordId};

impl AttachmentDb {
    /// Load the ordered collection of one (record, field) pair.
    pub async fn load_collection(
        &self,
        record_id: RecordId,
        field_name: &str,
    ) -> Result<AttachmentCollection> {
        let rows = sqlx::query(
            r#"
            SELECT file_name, path, size, width, height, source_url
            FROM attachments
            WHERE record_id = ?1 AND field_name = ?2
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(record_id)
        .bind(field_name)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|row| {
                let path: String = row.get("path");
                let size: i64 = row.get("size");
                let width: Option<i64> = row.get("width");
                let height: Option<i64> = row.get("height");
                Attachment {
                    file_name: row.get("file_name"),
                    path: PathBuf::from(path),
                    size: size.max(0) as u64,
                    width: width.and_then(|w| u32::try_from(w).ok()),
                    height: height.and_then(|h| u32::try_from(h).ok()),
                    source_url: row.get("source_url"),
                }
            })
            .collect();
        Ok(AttachmentCollection::new(items))
    }

    /// Persist one field of a record: replaces only that field's rows, in a
    /// single transaction. Files of attachments removed from the collection are
    /// deleted after the commit.
    pub async fn save_field(
        &self,
        record_id: RecordId,
        field_name: &str,
        collection: &AttachmentCollection,
    ) -> Result<()> {
        let now = unix_timestamp();
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            DELETE FROM attachments
            WHERE record_id = ?1 AND field_name = ?2
            "#,
        )
        .bind(record_id)
        .bind(field_name)
        .execute(&mut *tx)
        .await?;

        for (position, a) in collection.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO attachments (
                    record_id, field_name, position, file_name, path,
                    size, width, height, source_url, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(record_id)
            .bind(field_name)
            .bind(position as i64)
            .bind(&a.file_name)
            .bind(a.path.to_string_lossy().into_owned())
            .bind(a.size as i64)
            .bind(a.width.map(i64::from))
            .bind(a.height.map(i64::from))
            .bind(&a.source_url)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        for removed in collection.removed() {
            if collection.iter().any(|a| a.path == removed.path) {
                continue;
            }
            files::remove_quietly(&removed.path).await;
        }
        tracing::info!(
            record = record_id,
            field = field_name,
            count = collection.len(),
            removed = collection.removed().len(),
            "saved field"
        );
        Ok(())
    }
}
