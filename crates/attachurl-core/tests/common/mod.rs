#![allow(dead_code)]

pub mod file_server;

use std::io::Cursor;

/// A `width`x`height` image encoded in `format`.
pub fn encoded_image(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, format)
        .expect("encode test image");
    out.into_inner()
}

/// Makes every matching `attachments` insert in the SQLite file at `db_path`
/// abort with "disk full". `when` is an optional `WHEN ...` clause.
pub async fn fail_attachment_inserts(db_path: &std::path::Path, when: &str) {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&format!("sqlite://{}", db_path.display()))
        .await
        .expect("connect to test db");
    let sql = format!(
        "CREATE TRIGGER fail_attachment_insert BEFORE INSERT ON attachments {when} \
         BEGIN SELECT RAISE(ABORT, 'disk full'); END;"
    );
    sqlx::query(&sql).execute(&pool).await.expect("create trigger");
    pool.close().await;
}

/// Entries directly inside `dir`; empty when it doesn't exist.
pub fn dir_entries(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(rd) => rd.map(|e| e.expect("dir entry").path()).collect(),
        Err(_) => Vec::new(),
    }
}
