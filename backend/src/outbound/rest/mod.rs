//! Reqwest-backed adapter for the hosted record store.
//!
//! This adapter owns transport details only: request construction for the
//! store's REST dialect (equality filters, `Prefer` headers, range
//! pagination with `Content-Range` totals), HTTP error mapping, and JSON
//! decoding into domain records. No retries, no caching.

use std::time::Duration;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use reqwest::{Client, StatusCode, Url};
use tracing::error;
use uuid::Uuid;

use self::dto::{HandbookRowDto, InsertRowDto, UpdateRowDto};
use crate::domain::ports::{RecordStore, RecordStoreError};
use crate::domain::{HandbookDraft, HandbookRecord, HandbookUpdate};

mod dto;

/// Table holding handbook orders.
const TABLE: &str = "handbooks";

/// Failures constructing a [`RestRecordStore`].
#[derive(Debug, thiserror::Error)]
pub enum RestAdapterError {
    /// The configured endpoint cannot address the table.
    #[error("invalid record store endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to construct the record store client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Record store adapter speaking the hosted store's REST dialect.
pub struct RestRecordStore {
    client: Client,
    table_url: Url,
    api_key: String,
}

impl RestRecordStore {
    /// Build an adapter for the store at `endpoint` with an explicit
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RestAdapterError`] when the endpoint cannot be extended
    /// into a table URL or the HTTP client cannot be constructed.
    pub fn new(
        endpoint: &Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RestAdapterError> {
        let table_url = with_trailing_slash(endpoint.clone()).join(&format!("rest/v1/{TABLE}"))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            table_url,
            api_key: api_key.into(),
        })
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn read_rows(
        operation: &str,
        response: reqwest::Response,
    ) -> Result<Vec<HandbookRowDto>, RecordStoreError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(operation, &error))?;
        if !status.is_success() {
            return Err(map_status_error(operation, status, body.as_ref()));
        }
        serde_json::from_slice(&body).map_err(|error| {
            RecordStoreError::decode(format!("{operation}: invalid row payload: {error}"))
        })
    }
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn create(&self, draft: &HandbookDraft) -> Result<HandbookRecord, RecordStoreError> {
        let response = self
            .request(self.client.post(self.table_url.clone()))
            .header("Prefer", "return=representation")
            .json(&InsertRowDto::from(draft))
            .send()
            .await
            .map_err(|error| map_transport_error("create", &error))?;

        let rows = Self::read_rows("create", response).await?;
        let row = rows.into_iter().next().ok_or_else(|| {
            RecordStoreError::decode("create: store returned no representation")
        })?;
        row.into_domain().map_err(RecordStoreError::decode)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<HandbookRecord, RecordStoreError> {
        let response = self
            .request(self.client.get(self.table_url.clone()))
            .query(&[("select", "*".to_owned()), ("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|error| map_transport_error("get_by_id", &error))?;

        let mut rows = Self::read_rows("get_by_id", response).await?;
        match rows.len() {
            0 => Err(RecordStoreError::NotFound { id }),
            1 => rows
                .pop()
                .ok_or_else(|| RecordStoreError::decode("get_by_id: row vanished"))?
                .into_domain()
                .map_err(RecordStoreError::decode),
            matches => Err(RecordStoreError::AmbiguousIdentifier { id, matches }),
        }
    }

    async fn update(
        &self,
        id: Uuid,
        update: &HandbookUpdate,
    ) -> Result<HandbookRecord, RecordStoreError> {
        let response = self
            .request(self.client.patch(self.table_url.clone()))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&UpdateRowDto::from(update))
            .send()
            .await
            .map_err(|error| map_transport_error("update", &error))?;

        let rows = Self::read_rows("update", response).await?;
        let Some(row) = rows.into_iter().next() else {
            return Err(RecordStoreError::NotFound { id });
        };
        row.into_domain().map_err(RecordStoreError::decode)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<HandbookRecord>, RecordStoreError> {
        let response = self
            .request(self.client.get(self.table_url.clone()))
            .query(&[
                ("select", "*".to_owned()),
                ("order", "created_at.desc".to_owned()),
                ("limit", page.limit().to_string()),
                ("offset", page.offset().to_string()),
            ])
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|error| map_transport_error("list", &error))?;

        let reported_total = content_range_total(&response);
        let rows = Self::read_rows("list", response).await?;
        let total = reported_total.ok_or_else(|| {
            RecordStoreError::decode("list: store reported no exact row count")
        })?;

        let items = rows
            .into_iter()
            .map(|row| row.into_domain().map_err(RecordStoreError::decode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, total))
    }
}

/// Append a trailing slash so [`Url::join`] extends instead of replacing
/// the endpoint's last path segment.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Extract the exact total from a `Content-Range` header (`0-4/17` or `*/0`).
fn content_range_total(response: &reqwest::Response) -> Option<u64> {
    let header = response.headers().get(reqwest::header::CONTENT_RANGE)?;
    parse_content_range_total(header.to_str().ok()?)
}

fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.rsplit_once('/')?;
    total.trim().parse().ok()
}

fn map_transport_error(operation: &str, error: &reqwest::Error) -> RecordStoreError {
    error!(%error, operation, "record store round trip failed");
    if error.is_timeout() {
        RecordStoreError::backend(format!("{operation}: request timed out: {error}"))
    } else {
        RecordStoreError::backend(format!("{operation}: {error}"))
    }
}

fn map_status_error(operation: &str, status: StatusCode, body: &[u8]) -> RecordStoreError {
    let preview = body_preview(body);
    error!(status = status.as_u16(), operation, %preview, "record store rejected the request");
    if preview.is_empty() {
        RecordStoreError::backend(format!("{operation}: status {}", status.as_u16()))
    } else {
        RecordStoreError::backend(format!(
            "{operation}: status {}: {preview}",
            status.as_u16()
        ))
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
