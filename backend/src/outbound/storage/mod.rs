//! Reqwest-backed adapter for the hosted object store.
//!
//! Uploads are upserts (`x-upsert: true`), listings are prefix queries
//! against the bucket, and deletes are idempotent: a missing path deletes
//! successfully. The public retrieval URL is derived from the endpoint,
//! bucket, and path, exactly as the hosted store serves public objects.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::ports::{ObjectMetadata, ObjectStore, ObjectStoreError, StoredObject};

/// Bucket holding handbook assets unless configured otherwise.
pub const DEFAULT_BUCKET: &str = "handbooks";

/// Cache lifetime advertised for uploaded assets.
const CACHE_CONTROL: &str = "max-age=3600";

/// Failures constructing an [`HttpObjectStore`].
#[derive(Debug, thiserror::Error)]
pub enum StorageAdapterError {
    /// The configured endpoint cannot address the bucket.
    #[error("invalid object store endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to construct the object store client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Object store adapter over the hosted store's storage API.
pub struct HttpObjectStore {
    client: Client,
    storage_root: Url,
    bucket: String,
    api_key: String,
}

impl HttpObjectStore {
    /// Build an adapter over the default bucket.
    ///
    /// # Errors
    ///
    /// Returns [`StorageAdapterError`] when the endpoint cannot be
    /// extended into a storage URL or the HTTP client cannot be built.
    pub fn new(
        endpoint: &Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StorageAdapterError> {
        Self::with_bucket(endpoint, api_key, DEFAULT_BUCKET, timeout)
    }

    /// Build an adapter over a named bucket.
    ///
    /// # Errors
    ///
    /// Returns [`StorageAdapterError`] when the endpoint cannot be
    /// extended into a storage URL or the HTTP client cannot be built.
    pub fn with_bucket(
        endpoint: &Url,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StorageAdapterError> {
        let storage_root = with_trailing_slash(endpoint.clone()).join("storage/v1/")?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            storage_root,
            bucket: bucket.into(),
            api_key: api_key.into(),
        })
    }

    fn object_url(&self, path: &str) -> Result<Url, ObjectStoreError> {
        self.storage_root
            .join(&format!("object/{}/{path}", self.bucket))
            .map_err(|error| ObjectStoreError::backend(format!("invalid object path: {error}")))
    }

    fn list_url(&self) -> Result<Url, ObjectStoreError> {
        self.storage_root
            .join(&format!("object/list/{}", self.bucket))
            .map_err(|error| ObjectStoreError::backend(format!("invalid bucket name: {error}")))
    }

    /// Publicly resolvable URL for an object at `path`.
    fn public_url(&self, path: &str) -> Result<String, ObjectStoreError> {
        self.storage_root
            .join(&format!("object/public/{}/{path}", self.bucket))
            .map(String::from)
            .map_err(|error| ObjectStoreError::backend(format!("invalid object path: {error}")))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, ObjectStoreError> {
        let response = self
            .request(self.client.post(self.object_url(path)?))
            .header("x-upsert", "true")
            .header(reqwest::header::CACHE_CONTROL, CACHE_CONTROL)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|error| map_transport_error("upload", &error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(map_status_error("upload", status, body.as_ref()));
        }

        Ok(StoredObject {
            path: path.to_owned(),
            url: self.public_url(path)?,
        })
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMetadata>, ObjectStoreError> {
        let response = self
            .request(self.client.post(self.list_url()?))
            .json(&ListRequestDto::for_prefix(prefix))
            .send()
            .await
            .map_err(|error| map_transport_error("list", &error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error("list", &error))?;
        if !status.is_success() {
            return Err(map_status_error("list", status, body.as_ref()));
        }

        let objects: Vec<ObjectDto> = serde_json::from_slice(&body).map_err(|error| {
            ObjectStoreError::decode(format!("list: invalid object payload: {error}"))
        })?;
        Ok(objects.into_iter().map(ObjectDto::into_metadata).collect())
    }

    async fn delete(&self, path: &str) -> Result<(), ObjectStoreError> {
        let response = self
            .request(self.client.delete(self.object_url(path)?))
            .send()
            .await
            .map_err(|error| map_transport_error("delete", &error))?;

        let status = response.status();
        // A missing object deletes successfully; only other failures surface.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error("delete", status, body.as_ref()))
    }
}

/// Listing request understood by the storage API.
#[derive(Debug, Serialize)]
struct ListRequestDto {
    prefix: String,
    limit: u32,
    offset: u32,
    #[serde(rename = "sortBy")]
    sort_by: SortByDto,
}

#[derive(Debug, Serialize)]
struct SortByDto {
    column: &'static str,
    order: &'static str,
}

impl ListRequestDto {
    fn for_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            limit: 1000,
            offset: 0,
            sort_by: SortByDto {
                column: "name",
                order: "asc",
            },
        }
    }
}

/// One listing entry as the storage API reports it.
#[derive(Debug, Deserialize)]
struct ObjectDto {
    name: String,
    created_at: Option<DateTime<Utc>>,
    metadata: Option<ObjectMetadataDto>,
}

#[derive(Debug, Deserialize)]
struct ObjectMetadataDto {
    size: Option<u64>,
    mimetype: Option<String>,
}

impl ObjectDto {
    fn into_metadata(self) -> ObjectMetadata {
        let (size, content_type) = match self.metadata {
            Some(metadata) => (metadata.size, metadata.mimetype),
            None => (None, None),
        };
        ObjectMetadata {
            name: self.name,
            size,
            content_type,
            created_at: self.created_at,
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn map_transport_error(operation: &str, error: &reqwest::Error) -> ObjectStoreError {
    error!(%error, operation, "object store round trip failed");
    if error.is_timeout() {
        ObjectStoreError::backend(format!("{operation}: request timed out: {error}"))
    } else {
        ObjectStoreError::backend(format!("{operation}: {error}"))
    }
}

fn map_status_error(operation: &str, status: StatusCode, body: &[u8]) -> ObjectStoreError {
    let preview: String = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(160)
        .collect();
    error!(status = status.as_u16(), operation, %preview, "object store rejected the request");
    if preview.is_empty() {
        ObjectStoreError::backend(format!("{operation}: status {}", status.as_u16()))
    } else {
        ObjectStoreError::backend(format!(
            "{operation}: status {}: {preview}",
            status.as_u16()
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for URL derivation and listing payload mapping.

    use super::*;

    fn store() -> HttpObjectStore {
        let endpoint = Url::parse("https://example.supabase.co").expect("valid endpoint");
        HttpObjectStore::new(&endpoint, "anon", Duration::from_secs(5)).expect("adapter builds")
    }

    #[test]
    fn public_url_names_endpoint_bucket_and_path() {
        let url = store()
            .public_url("logos/1746000000000_logo.png")
            .expect("path derives a URL");
        assert_eq!(
            url,
            "https://example.supabase.co/storage/v1/object/public/handbooks/logos/1746000000000_logo.png"
        );
    }

    #[test]
    fn object_url_keeps_hierarchical_paths() {
        let url = store().object_url("logos/a/b.png").expect("path derives a URL");
        assert_eq!(
            url.as_str(),
            "https://example.supabase.co/storage/v1/object/handbooks/logos/a/b.png"
        );
    }

    #[test]
    fn listing_request_carries_prefix_and_sort() {
        let value =
            serde_json::to_value(ListRequestDto::for_prefix("logos/")).expect("payload serialises");
        assert_eq!(value["prefix"], serde_json::json!("logos/"));
        assert_eq!(value["sortBy"]["column"], serde_json::json!("name"));
    }

    #[test]
    fn listing_entries_map_with_and_without_metadata() {
        let payload = serde_json::json!([
            {
                "name": "1746000000000_logo.png",
                "created_at": "2026-03-01T09:00:00Z",
                "metadata": { "size": 2048, "mimetype": "image/png" }
            },
            { "name": "placeholder", "created_at": null, "metadata": null }
        ]);
        let objects: Vec<ObjectDto> = serde_json::from_value(payload).expect("payload decodes");
        let mapped: Vec<_> = objects.into_iter().map(ObjectDto::into_metadata).collect();

        assert_eq!(mapped.len(), 2);
        let first = mapped.first().expect("two entries");
        assert_eq!(first.size, Some(2048));
        assert_eq!(first.content_type.as_deref(), Some("image/png"));
        let second = mapped.get(1).expect("two entries");
        assert!(second.size.is_none());
        assert!(second.created_at.is_none());
    }

    #[test]
    fn bucket_is_configurable() {
        let endpoint = Url::parse("https://example.supabase.co").expect("valid endpoint");
        let store =
            HttpObjectStore::with_bucket(&endpoint, "anon", "assets", Duration::from_secs(5))
                .expect("adapter builds");
        let url = store.public_url("x.png").expect("path derives a URL");
        assert_eq!(
            url,
            "https://example.supabase.co/storage/v1/object/public/assets/x.png"
        );
    }
}
