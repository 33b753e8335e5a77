//! Permanent attachment files: `<root>/<record id>/<file name>`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::model::RecordId;

/// Directory holding a record's files.
pub fn record_dir(root: &Path, record_id: RecordId) -> PathBuf {
    root.join(record_id.to_string())
}

/// Moves `src` into `dir` under its own file name, adding `-1`, `-2`, …
/// before the extension if the name is taken. Falls back to copy + remove
/// when `src` is on another filesystem. Returns the new path.
pub fn import_file(src: &Path, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let name = src
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("no file name: {}", src.display()))?;
    let dest = unique_path(dir, name);

    if std::fs::rename(src, &dest).is_err() {
        std::fs::copy(src, &dest)
            .with_context(|| format!("copy {} to {}", src.display(), dest.display()))?;
        std::fs::remove_file(src).with_context(|| format!("remove {}", src.display()))?;
    }
    Ok(dest)
}

/// First free path for `name` in `dir`.
pub fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1u32..)
        .map(|n| match ext {
            Some(ext) => dir.join(format!("{stem}-{n}.{ext}")),
            None => dir.join(format!("{stem}-{n}")),
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Delete a file, logging instead of failing.
pub(crate) async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "deleted file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "could not delete file: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_path_suffixes_before_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(unique_path(dir.path(), "a.jpg"), dir.path().join("a.jpg"));
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "a.jpg"), dir.path().join("a-1.jpg"));
        std::fs::write(dir.path().join("a-1.jpg"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "a.jpg"), dir.path().join("a-2.jpg"));
        std::fs::write(dir.path().join("README"), b"x").unwrap();
        assert_eq!(unique_path(dir.path(), "README"), dir.path().join("README-1"));
    }

    #[test]
    fn import_moves_file_into_record_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let src = tmp.path().join("photo.jpg");
        std::fs::write(&src, b"jpeg bytes").unwrap();

        let dir = record_dir(root.path(), 7);
        let dest = import_file(&src, &dir).unwrap();
        assert_eq!(dest, root.path().join("7").join("photo.jpg"));
        assert!(!src.exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"jpeg bytes");
    }
}
