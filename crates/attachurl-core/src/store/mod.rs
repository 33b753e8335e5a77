//! Persistent records, field definitions and attachments (SQLite via sqlx),
//! plus the permanent file area attachments are relocated into.

pub mod db;
pub mod files;
mod attachments;
mod records;

pub use db::AttachmentDb;

#[cfg(test)]
mod tests;
