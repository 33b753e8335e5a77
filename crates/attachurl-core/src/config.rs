use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::mime_map::DEFAULT_MIME_TYPES;

/// Global configuration loaded from `~/.config/attachurl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachConfig {
    /// MIME type to file extension mappings, one `type:extension` per line.
    /// Used when validating downloads whose URL has no file extension.
    #[serde(default = "default_mime_types")]
    pub mime_types: String,
    /// User-Agent header sent with every download (some hosts require one).
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Hosts render the URL textarea permanently instead of behind a toggle.
    #[serde(default)]
    pub always_show_field: bool,
    /// Convert WebP downloads to JPEG before attaching.
    #[serde(default)]
    pub convert_webp: bool,
    /// Connection timeout per download, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Hard timeout per download, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Root for permanent attachment files (None = XDG data dir).
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

fn default_mime_types() -> String {
    DEFAULT_MIME_TYPES.to_string()
}

fn default_connect_timeout() -> u64 {
    15
}

fn default_timeout() -> u64 {
    300
}

impl Default for AttachConfig {
    fn default() -> Self {
        Self {
            mime_types: default_mime_types(),
            user_agent: None,
            always_show_field: false,
            convert_webp: false,
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_timeout(),
            storage_dir: None,
        }
    }
}

impl AttachConfig {
    /// Permanent file root: `storage_dir` if set, else `~/.local/share/attachurl/files`.
    pub fn resolve_storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("attachurl")?;
        Ok(xdg_dirs.get_data_home().join("files"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("attachurl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AttachConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AttachConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<AttachConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: AttachConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
