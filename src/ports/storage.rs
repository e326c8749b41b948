//! Storage port for the trust store's persisted slots (spec.md §6).
//!
//! Adapted from the teacher's `StoragePort`/`StorageError`, trimmed of the
//! filesystem-specific `StorageConfig`/`SyncMode` fields — those are an
//! embedder concern, not something the trust core's persistence layer needs
//! to see through this interface.

use async_trait::async_trait;
use thiserror::Error;

/// Port for the persistence substrate. No multi-slot transactions are
/// assumed; each named slot is written atomically (spec.md §6).
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Open (or create) a namespace, returning an opaque handle.
    async fn open(&self, namespace: &str) -> Result<(), StorageError>;

    /// Read a slot's bytes.
    async fn read(&self, namespace: &str, slot: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a slot's bytes atomically.
    async fn write(&self, namespace: &str, slot: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Enumerate slot names under a prefix.
    async fn enumerate(&self, namespace: &str, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Remove a slot.
    async fn remove(&self, namespace: &str, slot: &str) -> Result<(), StorageError>;
}

/// Storage-specific errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Slot does not exist.
    #[error("slot not found: {0}")]
    NotFound(String),

    /// Storage medium is out of space.
    #[error("storage full")]
    Full,

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(String),

    /// Backend-specific failure not covered above.
    #[error("storage backend error: {0}")]
    BackendError(String),
}
