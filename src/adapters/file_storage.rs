//! Filesystem-backed storage adapter.
//!
//! Grounded on `storage/mod.rs`'s `FileKeyStorage` (one file per entry,
//! directory-per-namespace layout), adapted to the namespace+slot shape
//! [`crate::ports::storage::StoragePort`] exposes instead of the teacher's
//! path-based key storage API.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::ports::storage::{StorageError, StoragePort};

/// `StoragePort` backed by one file per slot, under `root/namespace/slot`.
/// Slot names are sanitized to a filesystem-safe form so a `cert_id`
/// containing path separators can't escape the namespace directory.
pub struct FileStorageAdapter {
    root: PathBuf,
}

impl FileStorageAdapter {
    /// Construct an adapter rooted at `root`. `root` need not exist yet —
    /// [`StoragePort::open`] creates it.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.root.join(sanitize(namespace))
    }

    fn slot_path(&self, namespace: &str, slot: &str) -> PathBuf {
        self.namespace_dir(namespace).join(sanitize(slot))
    }
}

fn sanitize(component: &str) -> String {
    component.replace(['/', '\\', '\0'], "_")
}

fn io_err(e: std::io::Error) -> StorageError {
    StorageError::Io(e.to_string())
}

#[async_trait]
impl StoragePort for FileStorageAdapter {
    async fn open(&self, namespace: &str) -> Result<(), StorageError> {
        fs::create_dir_all(self.namespace_dir(namespace))
            .await
            .map_err(io_err)
    }

    async fn read(&self, namespace: &str, slot: &str) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.slot_path(namespace, slot)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(slot.to_string()))
            }
            Err(e) => Err(io_err(e)),
        }
    }

    async fn write(&self, namespace: &str, slot: &str, data: &[u8]) -> Result<(), StorageError> {
        fs::create_dir_all(self.namespace_dir(namespace))
            .await
            .map_err(io_err)?;
        fs::write(self.slot_path(namespace, slot), data)
            .await
            .map_err(io_err)
    }

    async fn enumerate(&self, namespace: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.namespace_dir(namespace);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(e)),
        };

        let sanitized_prefix = sanitize(prefix);
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(&sanitized_prefix) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn remove(&self, namespace: &str, slot: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path(namespace, slot)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(e)),
        }
    }
}

impl AsRef<Path> for FileStorageAdapter {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_then_read_round_trips_through_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FileStorageAdapter::new(dir.path());
        adapter.open("ns").await.unwrap();
        adapter.write("ns", "cert:a", b"hello").await.unwrap();
        assert_eq!(adapter.read("ns", "cert:a").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn slot_names_with_separators_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FileStorageAdapter::new(dir.path());
        adapter.write("ns", "../escape", b"x").await.unwrap();
        assert!(dir.path().join("ns").join(".._escape").exists());
    }

    #[tokio::test]
    async fn enumerate_lists_only_matching_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FileStorageAdapter::new(dir.path());
        adapter.write("ns", "cert:a", b"1").await.unwrap();
        adapter.write("ns", "profile:a", b"2").await.unwrap();
        let names = adapter.enumerate("ns", "cert:").await.unwrap();
        assert_eq!(names, vec!["cert:a".to_string()]);
    }
}
