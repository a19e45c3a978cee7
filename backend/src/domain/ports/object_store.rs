//! Port abstraction for the hosted object store holding uploaded assets.
//!
//! The bucket is fixed when an adapter is constructed; callers address
//! objects by hierarchical path only and are responsible for generating
//! collision-resistant paths.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failures raised by object store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectStoreError {
    /// The backend rejected the operation: quota, permission, or
    /// connectivity failure.
    #[error("object store request failed: {message}")]
    Backend {
        /// Adapter-provided description of the rejection.
        message: String,
    },
    /// The backend answered with a payload this adapter cannot decode.
    #[error("object store payload could not be decoded: {message}")]
    Decode {
        /// What failed to decode.
        message: String,
    },
}

impl ObjectStoreError {
    /// Backend rejection with a descriptive message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Undecodable payload with a descriptive message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Result of a successful upload: where the blob landed and how the public
/// can retrieve it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Path of the object inside the bucket.
    pub path: String,
    /// Publicly resolvable retrieval URL.
    pub url: String,
}

/// Metadata for one stored object as reported by a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Object name as the backend's listing reports it.
    pub name: String,
    /// Size in bytes, when the backend reports one.
    pub size: Option<u64>,
    /// Content type, when the backend reports one.
    pub content_type: Option<String>,
    /// Creation timestamp, when the backend reports one.
    pub created_at: Option<DateTime<Utc>>,
}

/// Upload, list, and delete blobs in the external store's bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write the blob at `path`, overwriting any existing object there
    /// (upsert semantics), and return the stored path plus its public URL.
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, ObjectStoreError>;

    /// Return metadata for objects under `prefix`; an empty prefix lists
    /// the whole bucket.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMetadata>, ObjectStoreError>;

    /// Remove the object at `path`. Deleting a non-existent path succeeds;
    /// no existence check is performed beforehand.
    async fn delete(&self, path: &str) -> Result<(), ObjectStoreError>;
}
