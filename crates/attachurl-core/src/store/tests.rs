//! Tests for the record store (in-memory DB).

use std::path::PathBuf;

use crate::model::{Attachment, AttachmentCollection, AttachmentField, ContainerRef, FieldKind};
use crate::store::AttachmentDb;

fn attachment(path: PathBuf, size: u64) -> Attachment {
    Attachment {
        file_name: path.file_name().unwrap().to_string_lossy().into_owned(),
        path,
        size,
        width: Some(10),
        height: Some(5),
        source_url: Some("https://example.com/a.jpg".to_string()),
    }
}

#[tokio::test]
async fn records_roundtrip_with_container() {
    let db = AttachmentDb::open_memory().await.unwrap();
    let parent = db.add_record(None).await.unwrap();
    let container = ContainerRef {
        record_id: parent,
        field: "gallery_items".to_string(),
    };
    let child = db.add_record(Some(&container)).await.unwrap();

    let p = db.get_record(parent).await.unwrap().unwrap();
    assert!(!p.is_nested());
    let c = db.get_record(child).await.unwrap().unwrap();
    assert_eq!(c.container, Some(container));
    assert!(db.get_record(999).await.unwrap().is_none());
}

#[tokio::test]
async fn fields_put_get_update() {
    let db = AttachmentDb::open_memory().await.unwrap();
    let mut field = AttachmentField::new("images", FieldKind::Image, "jpg png");
    field.max_files = 3;
    field.max_width = Some(800);
    field.use_roles = true;
    field.edit_roles = vec!["editor".to_string()];
    db.put_field(&field).await.unwrap();
    assert_eq!(db.get_field("images").await.unwrap(), Some(field.clone()));

    field.max_files = 1;
    field.max_height = Some(600);
    db.put_field(&field).await.unwrap();
    let stored = db.get_field("images").await.unwrap().unwrap();
    assert_eq!(stored.max_files, 1);
    assert_eq!(stored.max_height, Some(600));

    db.put_field(&AttachmentField::new("docs", FieldKind::File, "pdf"))
        .await
        .unwrap();
    let names: Vec<_> = db
        .list_fields()
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, ["docs", "images"]);
    assert!(db.get_field("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn save_field_is_scoped_and_ordered() {
    let db = AttachmentDb::open_memory().await.unwrap();
    let record = db.add_record(None).await.unwrap();

    let mut images = AttachmentCollection::default();
    images.add(attachment(PathBuf::from("/files/1/b.jpg"), 2));
    images.add(attachment(PathBuf::from("/files/1/a.jpg"), 1));
    db.save_field(record, "images", &images).await.unwrap();

    let mut docs = AttachmentCollection::default();
    docs.add(attachment(PathBuf::from("/files/1/d.pdf"), 3));
    db.save_field(record, "docs", &docs).await.unwrap();

    let loaded = db.load_collection(record, "images").await.unwrap();
    let names: Vec<_> = loaded.iter().map(|a| a.file_name.as_str()).collect();
    assert_eq!(names, ["b.jpg", "a.jpg"]);
    assert_eq!(loaded.iter().next().unwrap().width, Some(10));
    assert_eq!(db.load_collection(record, "docs").await.unwrap().len(), 1);
    assert!(db.load_collection(record + 1, "images").await.unwrap().is_empty());
}

#[tokio::test]
async fn save_field_deletes_removed_files() {
    let db = AttachmentDb::open_memory().await.unwrap();
    let record = db.add_record(None).await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.jpg");
    let new = dir.path().join("new.jpg");
    std::fs::write(&old, b"old").unwrap();
    std::fs::write(&new, b"new").unwrap();

    let mut c = AttachmentCollection::default();
    c.add(attachment(old.clone(), 3));
    db.save_field(record, "image", &c).await.unwrap();

    let mut c = db.load_collection(record, "image").await.unwrap();
    c.remove_all();
    c.add(attachment(new.clone(), 3));
    db.save_field(record, "image", &c).await.unwrap();

    assert!(!old.exists());
    assert!(new.exists());
    let loaded = db.load_collection(record, "image").await.unwrap();
    assert_eq!(loaded.iter().next().unwrap().path, new);
}

#[tokio::test]
async fn open_at_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("records.db");
    let db = AttachmentDb::open_at(&path).await.unwrap();
    db.add_record(None).await.unwrap();
    assert!(path.exists());
}
