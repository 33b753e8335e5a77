//! Single-stream HTTP GET of a remote file into a local directory.
//!
//! One curl `Easy` handle per URL, redirects followed, body streamed straight
//! to `dest_dir/<file name>`. Blocking; call from `spawn_blocking` in async code.

mod error;

pub use error::FetchError;

use crate::config::AttachConfig;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A downloaded file and the number of bytes written to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Fetches URLs with an optional User-Agent and fixed timeouts.
#[derive(Debug, Clone)]
pub struct Downloader {
    user_agent: Option<String>,
    connect_timeout: Duration,
    timeout: Duration,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::from_config(&AttachConfig::default())
    }
}

impl Downloader {
    pub fn new(user_agent: Option<String>, connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.filter(|ua| !ua.trim().is_empty()),
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &AttachConfig) -> Self {
        Self::new(
            cfg.user_agent.clone(),
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Copies the resource at `url` byte-for-byte to `dest_dir/file_name`.
    ///
    /// Any transport error or non-2xx final status fails the fetch and removes
    /// the partial file.
    pub fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        file_name: &str,
    ) -> Result<FetchedFile, FetchError> {
        let path = dest_dir.join(file_name);
        match self.fetch_to(url, &path) {
            Ok(bytes) => {
                tracing::debug!(url, bytes, path = %path.display(), "fetched");
                Ok(FetchedFile { path, bytes })
            }
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(&path) {
                    if rm.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %path.display(), "could not remove partial file: {}", rm);
                    }
                }
                Err(e)
            }
        }
    }

    fn fetch_to(&self, url: &str, path: &Path) -> Result<u64, FetchError> {
        let mut file = File::create(path)?;
        let mut written = 0u64;
        let mut write_error: Option<std::io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        if let Some(ua) = &self.user_agent {
            easy.useragent(ua)?;
        }

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };
        if let Err(e) = performed {
            if e.is_write_error() {
                if let Some(io_err) = write_error.take() {
                    return Err(FetchError::Io(io_err));
                }
            }
            return Err(FetchError::Curl(e));
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        file.flush()?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_user_agent_is_ignored() {
        let d = Downloader::new(Some("  ".to_string()), Duration::from_secs(1), Duration::from_secs(1));
        assert_eq!(d.user_agent(), None);
        let d = Downloader::new(Some("Bot/1.0".to_string()), Duration::from_secs(1), Duration::from_secs(1));
        assert_eq!(d.user_agent(), Some("Bot/1.0"));
    }

    #[test]
    fn unreachable_host_fails_and_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let d = Downloader::new(None, Duration::from_secs(2), Duration::from_secs(2));
        // Port 9 on localhost (discard) is almost never listening.
        let err = d
            .fetch("http://127.0.0.1:9/file.jpg", dir.path(), "file.jpg")
            .unwrap_err();
        assert!(matches!(err, FetchError::Curl(_)));
        assert!(!dir.path().join("file.jpg").exists());
    }

    #[test]
    fn missing_dest_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let d = Downloader::default();
        let err = d
            .fetch("http://127.0.0.1:9/x", &dir.path().join("nope"), "x")
            .unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }
}
