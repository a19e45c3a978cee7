//! In-memory object store adapter.
//!
//! Upsert-on-write, prefix listing, and idempotent delete, like the hosted
//! bucket. Public URLs use a `memory://` scheme so confirmation payloads
//! remain inspectable in tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{ObjectMetadata, ObjectStore, ObjectStoreError, StoredObject};

#[derive(Debug, Clone)]
struct StoredBlob {
    content_type: String,
    size: u64,
    created_at: DateTime<Utc>,
}

/// Process-local bucket of stored blobs keyed by path.
#[derive(Debug)]
pub struct InMemoryObjectStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredBlob>>,
}

impl InMemoryObjectStore {
    /// An empty store over the default `handbooks` bucket.
    pub fn new() -> Self {
        Self::with_bucket("handbooks")
    }

    /// An empty store over a named bucket.
    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, StoredBlob>>, ObjectStoreError> {
        self.objects
            .lock()
            .map_err(|_| ObjectStoreError::backend("object store mutex poisoned"))
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, ObjectStoreError> {
        let blob = StoredBlob {
            content_type: content_type.to_owned(),
            size: bytes.len() as u64,
            created_at: Utc::now(),
        };
        self.lock()?.insert(path.to_owned(), blob);
        Ok(StoredObject {
            path: path.to_owned(),
            url: format!("memory://{}/{path}", self.bucket),
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMetadata>, ObjectStoreError> {
        let objects = self.lock()?;
        Ok(objects
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, blob)| ObjectMetadata {
                name: path.clone(),
                size: Some(blob.size),
                content_type: Some(blob.content_type.clone()),
                created_at: Some(blob.created_at),
            })
            .collect())
    }

    async fn delete(&self, path: &str) -> Result<(), ObjectStoreError> {
        self.lock()?.remove(path);
        Ok(())
    }
}
