//! Outcome of one ingestion call.

use super::IngestError;
use crate::model::{Attachment, RecordId};

/// A URL that became an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub url: String,
    pub attachment: Attachment,
    /// Bytes received from the remote host, before any conversion or resize.
    pub downloaded_bytes: u64,
}

/// A URL that did not, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub url: String,
    pub error: IngestError,
}

/// Accepted and rejected URLs for one (record, field), each in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub record_id: RecordId,
    pub field: String,
    pub accepted: Vec<Accepted>,
    pub rejected: Vec<Rejected>,
    /// Set when the field filled up before every URL was tried.
    pub capacity_reached: bool,
    /// Whether the collection was persisted.
    pub saved: bool,
}

impl IngestReport {
    pub fn new(record_id: RecordId, field: &str) -> Self {
        Self {
            record_id,
            field: field.to_string(),
            accepted: Vec::new(),
            rejected: Vec::new(),
            capacity_reached: false,
            saved: false,
        }
    }

    pub(crate) fn reject(&mut self, url: &str, error: IngestError) {
        self.rejected.push(Rejected {
            url: url.to_string(),
            error,
        });
    }

    pub fn accepted_urls(&self) -> Vec<&str> {
        self.accepted.iter().map(|a| a.url.as_str()).collect()
    }

    pub fn rejected_urls(&self) -> Vec<&str> {
        self.rejected.iter().map(|r| r.url.as_str()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}
