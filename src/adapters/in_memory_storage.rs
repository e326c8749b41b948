//! In-memory storage adapter, for tests and bring-up.
//!
//! Adapted from the teacher's `InMemoryStorageAdapter`
//! (`Arc<RwLock<HashMap<..>>>`-backed), simplified to the flat
//! namespace+slot shape [`crate::ports::storage::StoragePort`] exposes.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::ports::storage::{StorageError, StoragePort};

/// In-memory `StoragePort`, keyed by `(namespace, slot)`.
#[derive(Default)]
pub struct InMemoryStorageAdapter {
    slots: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryStorageAdapter {
    /// Construct an empty adapter.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoragePort for InMemoryStorageAdapter {
    async fn open(&self, _namespace: &str) -> Result<(), StorageError> {
        Ok(())
    }

    async fn read(&self, namespace: &str, slot: &str) -> Result<Vec<u8>, StorageError> {
        self.slots
            .read()
            .unwrap()
            .get(&(namespace.to_string(), slot.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(slot.to_string()))
    }

    async fn write(&self, namespace: &str, slot: &str, data: &[u8]) -> Result<(), StorageError> {
        self.slots
            .write()
            .unwrap()
            .insert((namespace.to_string(), slot.to_string()), data.to_vec());
        Ok(())
    }

    async fn enumerate(&self, namespace: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let slots = self.slots.read().unwrap();
        let mut names: Vec<String> = slots
            .keys()
            .filter(|(ns, slot)| ns == namespace && slot.starts_with(prefix))
            .map(|(_, slot)| slot.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn remove(&self, namespace: &str, slot: &str) -> Result<(), StorageError> {
        self.slots
            .write()
            .unwrap()
            .remove(&(namespace.to_string(), slot.to_string()));
        Ok(())
    }
}
