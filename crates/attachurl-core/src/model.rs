//! Records, attachment fields and their file collections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Record identifier.
pub type RecordId = i64;

/// Slot count used for fields without a file limit.
pub const UNLIMITED_SLOTS: usize = 9999;

/// A data entity owning attachment fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    /// Set when this record is an item nested inside another record's
    /// repeater-style container field.
    pub container: Option<ContainerRef>,
}

impl Record {
    pub fn is_nested(&self) -> bool {
        self.container.is_some()
    }
}

/// The owning record and container field of a nested record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRef {
    pub record_id: RecordId,
    pub field: String,
}

/// Image fields carry dimensions and resize limits; file fields don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Image,
    #[default]
    File,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Image => "image",
            FieldKind::File => "file",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "image" => FieldKind::Image,
            _ => FieldKind::File,
        }
    }
}

/// Lower-cased extension allow-list. Authored as a space or comma separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedExtensions(BTreeSet<String>);

impl AllowedExtensions {
    pub fn parse(list: &str) -> Self {
        Self(
            list.split(|c: char| c == ',' || c.is_whitespace())
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, ext: &str) -> bool {
        !ext.is_empty() && self.0.contains(&ext.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Space separated form, as stored.
    pub fn to_list(&self) -> String {
        self.iter().collect::<Vec<_>>().join(" ")
    }
}

/// A field configured to hold one or more files or images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentField {
    pub name: String,
    pub kind: FieldKind,
    /// 0 = unlimited, 1 = single slot that new uploads overwrite.
    pub max_files: u32,
    pub extensions: AllowedExtensions,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// When false the field has no role restriction.
    pub use_roles: bool,
    /// Roles allowed to edit when `use_roles` is set.
    pub edit_roles: Vec<String>,
}

impl AttachmentField {
    pub fn new(name: impl Into<String>, kind: FieldKind, extensions: &str) -> Self {
        Self {
            name: name.into(),
            kind,
            max_files: 0,
            extensions: AllowedExtensions::parse(extensions),
            max_width: None,
            max_height: None,
            use_roles: false,
            edit_roles: Vec::new(),
        }
    }

    pub fn is_single(&self) -> bool {
        self.max_files == 1
    }

    /// How many more attachments an ingestion may add given the current count.
    /// A single-slot field always has one slot since it is overwritten.
    pub fn remaining_slots(&self, current: usize) -> usize {
        match self.max_files {
            0 => UNLIMITED_SLOTS,
            1 => 1,
            max => (max as usize).saturating_sub(current),
        }
    }
}

/// One stored file attached to a field instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    /// Absolute path in permanent storage.
    pub path: PathBuf,
    pub size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub source_url: Option<String>,
}

/// Ordered attachments of one (record, field) pair, loaded before ingestion
/// and saved once afterwards.
#[derive(Debug, Clone, Default)]
pub struct AttachmentCollection {
    items: Vec<Attachment>,
    removed: Vec<Attachment>,
}

impl AttachmentCollection {
    pub fn new(items: Vec<Attachment>) -> Self {
        Self {
            items,
            removed: Vec::new(),
        }
    }

    pub fn add(&mut self, attachment: Attachment) {
        self.items.push(attachment);
    }

    /// Drop every attachment; their files are deleted when the collection is saved.
    pub fn remove_all(&mut self) {
        self.removed.append(&mut self.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attachment> {
        self.items.iter()
    }

    pub fn last_mut(&mut self) -> Option<&mut Attachment> {
        self.items.last_mut()
    }

    pub fn removed(&self) -> &[Attachment] {
        &self.removed
    }
}
