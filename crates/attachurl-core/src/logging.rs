//! Tracing setup. Records go to an append-only file in the XDG state dir,
//! which is also where API-origin ingestion notices end up. When that file
//! cannot be opened, output goes to stderr instead.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info,attachurl=debug,attachurl_core=debug";

const LOG_FILE_NAME: &str = "attachurl.log";

/// Where log output ended up after [`init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Stderr,
}

/// `~/.local/state/attachurl/attachurl.log`
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("attachurl")?;
    Ok(dirs.get_state_home().join(LOG_FILE_NAME))
}

/// Installs the global subscriber, preferring the log file.
pub fn init() -> LogTarget {
    match open_log_file() {
        Ok((file, path)) => {
            install(SharedLogFile(file));
            tracing::info!(path = %path.display(), "attachurl logging initialized");
            LogTarget::File
        }
        Err(e) => {
            install(io::stderr);
            tracing::warn!("log file unavailable, logging to stderr: {:#}", e);
            LogTarget::Stderr
        }
    }
}

fn open_log_file() -> Result<(File, PathBuf)> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    Ok((file, path))
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn install<W>(writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

/// Hands each event a clone of the log file handle, or stderr if cloning fails.
struct SharedLogFile(File);

enum EventWriter {
    File(File),
    Stderr(io::Stderr),
}

impl io::Write for EventWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            EventWriter::File(f) => f.write(buf),
            EventWriter::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            EventWriter::File(f) => f.flush(),
            EventWriter::Stderr(s) => s.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for SharedLogFile {
    type Writer = EventWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => EventWriter::File(f),
            Err(_) => EventWriter::Stderr(io::stderr()),
        }
    }
}
