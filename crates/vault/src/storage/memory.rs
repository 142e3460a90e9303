//! In-memory [`StorageGateway`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{StorageError, StorageGateway, StoredObject};
use crate::mode::Metadata;

/// One stored entry, including the provider key id it was written with.
#[derive(Debug, Clone)]
pub struct Entry {
    pub body: Vec<u8>,
    pub metadata: Metadata,
    pub provider_key_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn entry(&self, storage_key: &str) -> Option<Entry> {
        self.objects.lock().unwrap().get(storage_key).cloned()
    }

    /// Insert raw bytes directly, bypassing the write path.
    pub fn insert(&self, storage_key: &str, body: Vec<u8>, metadata: Metadata) {
        self.objects.lock().unwrap().insert(
            storage_key.to_owned(),
            Entry {
                body,
                metadata,
                provider_key_id: None,
            },
        );
    }
}

#[async_trait]
impl StorageGateway for MemoryStore {
    async fn put(
        &self,
        storage_key: &str,
        body: Vec<u8>,
        metadata: Metadata,
        provider_key_id: Option<String>,
    ) -> Result<(), StorageError> {
        self.objects.lock().unwrap().insert(
            storage_key.to_owned(),
            Entry {
                body,
                metadata,
                provider_key_id,
            },
        );
        Ok(())
    }

    async fn get(&self, storage_key: &str) -> Result<StoredObject, StorageError> {
        let entry = self
            .entry(storage_key)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_owned()))?;
        Ok(StoredObject {
            key: storage_key.to_owned(),
            body: entry.body,
            metadata: entry.metadata,
        })
    }

    async fn list(&self, prefix: &str, max: i32) -> Result<Vec<String>, StorageError> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys.truncate(usize::try_from(max).unwrap_or(0));
        Ok(keys)
    }
}
