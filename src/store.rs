//! File store: the directory on disk holding uploaded recordings.
//!
//! The filesystem entry is the record; no separate index or metadata store
//! exists. All lookups resolve client-controlled filenames through a
//! containment check before touching the disk.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A directory entry as seen by the catalog: name, size, and creation time.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// Reject filenames that could escape the store directory: empty names,
/// `.`/`..`, path separators, or NUL bytes.
///
/// The upstream behavior joined client-controlled text straight into the
/// path; this check is a deliberate hardening on top of it.
pub fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains('/')
        && !filename.contains('\\')
        && !filename.contains('\0')
}

#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the store directory if it does not exist. Called at startup;
    /// the directory is the system's only durable state.
    pub fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create upload directory {}", self.root.display()))?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a client-supplied filename against the store root, or `None` if
    /// it fails the containment check.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if is_safe_filename(filename) {
            Some(self.root.join(filename))
        } else {
            None
        }
    }

    /// Persist a file under the given (already derived and checked) name.
    /// An existing file with the same name is overwritten; same-second
    /// collisions of identical names race at the filesystem, last writer
    /// wins.
    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(filename);
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        info!(filename, size = data.len(), "stored recording");
        Ok(path)
    }

    /// Read a file's bytes. Errors pass through so callers can distinguish
    /// a missing file from other I/O failures.
    pub async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    /// Remove a file. Removing an absent file is an error, surfaced as-is.
    pub async fn delete(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    /// Scan the store directory: regular files only, directories skipped.
    /// Creation time falls back to mtime on filesystems without birth time.
    pub async fn entries(&self) -> Result<Vec<StoredFile>> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .with_context(|| format!("failed to read upload directory {}", self.root.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = dir.next_entry().await.context("failed to read directory entry")? {
            let metadata = entry.metadata().await.context("failed to stat directory entry")?;
            if !metadata.is_file() {
                continue;
            }

            let created = metadata.created().or_else(|_| metadata.modified())?;
            files.push(StoredFile {
                filename: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                created_at: created.into(),
            });
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_traversal_and_separators() {
        assert!(!is_safe_filename(""));
        assert!(!is_safe_filename("."));
        assert!(!is_safe_filename(".."));
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/b.mp3"));
        assert!(!is_safe_filename("a\\b.mp3"));
        assert!(!is_safe_filename("a\0b.mp3"));
    }

    #[test]
    fn accepts_ordinary_names() {
        assert!(is_safe_filename("voice-20240301100000.mp3"));
        assert!(is_safe_filename("测试录音-20240301100000.m4a"));
        // A leading dot is a hidden file, not a traversal.
        assert!(is_safe_filename(".hidden.wav"));
        // `..` embedded in a name is harmless without separators.
        assert!(is_safe_filename("a..b.mp3"));
    }

    #[tokio::test]
    async fn save_read_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let path = store.save("clip.mp3", b"mp3-bytes").await.unwrap();
        assert_eq!(store.read(&path).await.unwrap(), b"mp3-bytes");

        store.delete(&path).await.unwrap();
        let err = store.read(&path).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn entries_skip_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("a.mp3", b"a").await.unwrap();
        store.save("b.wav", b"bb").await.unwrap();
        tokio::fs::create_dir(dir.path().join("subdir")).await.unwrap();

        let mut entries = store.entries().await.unwrap();
        entries.sort_by(|x, y| x.filename.cmp(&y.filename));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].filename, "a.mp3");
        assert_eq!(entries[0].size, 1);
        assert_eq!(entries[1].filename, "b.wav");
        assert_eq!(entries[1].size, 2);
    }

    #[tokio::test]
    async fn resolve_refuses_unsafe_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.resolve("..").is_none());
        assert!(store.resolve("../secret").is_none());
        assert!(store.resolve("clip.mp3").is_some());
    }
}
