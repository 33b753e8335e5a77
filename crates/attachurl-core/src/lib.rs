pub mod config;
pub mod logging;

pub mod downloader;
pub mod entry;
pub mod imaging;
pub mod ingest;
pub mod mime_map;
pub mod model;
pub mod notice;
pub mod permission;
pub mod sniff;
pub mod store;
pub mod url_model;
