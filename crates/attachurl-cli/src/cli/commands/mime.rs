//! `attachurl mime [<type>]` – inspect the configured MIME mapping.

use anyhow::{bail, Result};
use attachurl_core::config::AttachConfig;
use attachurl_core::mime_map::MimeMapping;

pub fn run_mime(cfg: &AttachConfig, mime_type: Option<&str>) -> Result<()> {
    let map = MimeMapping::parse(&cfg.mime_types);
    match mime_type {
        Some(t) => match map.lookup(t) {
            Some(ext) => println!("{ext}"),
            None => bail!("no extension mapped for MIME type \"{t}\""),
        },
        None => {
            for (mime, ext) in map.entries() {
                println!("{mime}:{ext}");
            }
        }
    }
    Ok(())
}
