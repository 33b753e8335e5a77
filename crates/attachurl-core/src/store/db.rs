//! SQLite-backed record store.
//!
//! Handles connection, migrations, and timestamp helpers. Record, field and
//! attachment CRUD lives in sibling modules.

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// `sqlite://` URI for a filesystem path, escaping characters the URI parser treats specially.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the record database.
///
/// The database file is stored under the XDG state directory:
/// `~/.local/state/attachurl/records.db` on Debian.
#[derive(Clone)]
pub struct AttachmentDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl AttachmentDb {
    /// Open (or create) the default database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("attachurl")?;
        let state_dir = xdg_dirs.get_state_home();
        Self::open_at(state_dir.join("records.db")).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let db = AttachmentDb { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Open a private in-memory database (tests and dry runs). The single
    /// connection is never recycled; closing it would drop the data.
    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        let db = AttachmentDb { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        // - `records.container_*` is set for items nested in a repeater-style field.
        // - `fields.edit_roles` is a JSON array of role names.
        // - `attachments.position` keeps collection order within (record, field).
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                container_record_id INTEGER,
                container_field TEXT,
                created_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fields (
                name TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                max_files INTEGER NOT NULL DEFAULT 0,
                extensions TEXT NOT NULL DEFAULT '',
                max_width INTEGER,
                max_height INTEGER,
                use_roles INTEGER NOT NULL DEFAULT 0,
                edit_roles TEXT NOT NULL DEFAULT '[]'
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attachments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                record_id INTEGER NOT NULL,
                field_name TEXT NOT NULL,
                position INTEGER NOT NULL,
                file_name TEXT NOT NULL,
                path TEXT NOT NULL,
                size INTEGER NOT NULL,
                width INTEGER,
                height INTEGER,
                source_url TEXT,
                created_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS attachments_by_field
            ON attachments (record_id, field_name, position);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Current time as Unix seconds (for DB timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
