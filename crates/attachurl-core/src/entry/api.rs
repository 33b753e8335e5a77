//! Programmatic entry point: one URL or a list, for an already resolved record and field.

use anyhow::Result;

use crate::ingest::{IngestReport, Ingestor};
use crate::model::{AttachmentField, Record};
use crate::notice::{Notices, Origin};
use crate::store::AttachmentDb;

/// URLs passed through the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlInput {
    One(String),
    Many(Vec<String>),
}

/// Input that is neither a string nor a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Unexpected format: expected a URL string or an array of URL strings, got {0}")]
    UnexpectedFormat(String),
}

impl UrlInput {
    pub fn is_empty(&self) -> bool {
        match self {
            UrlInput::One(s) => s.is_empty(),
            UrlInput::Many(v) => v.is_empty(),
        }
    }

    pub fn into_urls(self) -> Vec<String> {
        match self {
            UrlInput::One(s) => vec![s.trim().to_string()],
            UrlInput::Many(v) => v,
        }
    }
}

impl From<&str> for UrlInput {
    fn from(s: &str) -> Self {
        UrlInput::One(s.to_string())
    }
}

impl From<String> for UrlInput {
    fn from(s: String) -> Self {
        UrlInput::One(s)
    }
}

impl From<Vec<String>> for UrlInput {
    fn from(v: Vec<String>) -> Self {
        UrlInput::Many(v)
    }
}

impl TryFrom<serde_json::Value> for UrlInput {
    type Error = InputError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;
        match value {
            Value::String(s) => Ok(UrlInput::One(s)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(InputError::UnexpectedFormat(json_kind(&other).to_string())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(UrlInput::Many),
            other => Err(InputError::UnexpectedFormat(json_kind(&other).to_string())),
        }
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Adds URL(s) to `field` on `record`. Problems are written to the log, not
/// shown to a user. Empty input does nothing and returns `None`.
pub async fn add_from_url(
    ingestor: &Ingestor,
    db: &AttachmentDb,
    record: &Record,
    field: &AttachmentField,
    input: impl Into<UrlInput>,
) -> Result<Option<IngestReport>> {
    let input = input.into();
    if input.is_empty() {
        return Ok(None);
    }
    let mut notices = Notices::new(Origin::Api);
    let report = ingestor
        .ingest(db, record, field, &input.into_urls(), &mut notices)
        .await?;
    Ok(Some(report))
}
