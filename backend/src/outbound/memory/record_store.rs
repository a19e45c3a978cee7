//! In-memory record store adapter.
//!
//! Backs the test suites and the development fallback used when no hosted
//! store is configured. Mirrors the hosted store's observable behaviour:
//! server-assigned identifier/timestamps/version, newest-first listings
//! with exact totals, and empty pages past the end of the listing.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use pagination::{Page, PageRequest};
use uuid::Uuid;

use crate::domain::ports::{RecordStore, RecordStoreError};
use crate::domain::{HandbookDraft, HandbookRecord, HandbookUpdate, PaymentStatus};

/// Process-local store of handbook rows.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    rows: Mutex<Vec<HandbookRecord>>,
}

impl InMemoryRecordStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<HandbookRecord>>, RecordStoreError> {
        self.rows
            .lock()
            .map_err(|_| RecordStoreError::backend("record store mutex poisoned"))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, draft: &HandbookDraft) -> Result<HandbookRecord, RecordStoreError> {
        let now = Utc::now();
        let record = HandbookRecord {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            association_name: draft.association_name.clone(),
            association_category: draft.association_category,
            address: draft.address.clone(),
            zip_code: draft.zip_code.clone(),
            city: draft.city.clone(),
            contact_person: draft.contact_person.clone(),
            contact_email: draft.contact_email.clone(),
            contact_phone: draft.contact_phone.clone(),
            customer_email: draft.customer_email.clone(),
            selected_sections: draft.selected_sections.clone(),
            custom_information: draft.custom_information.clone(),
            logo_url: draft.logo_url.clone(),
            pdf_url: None,
            site_url: None,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            version: 1,
        };
        self.lock()?.push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<HandbookRecord, RecordStoreError> {
        let rows = self.lock()?;
        let mut matches = rows.iter().filter(|row| row.id == id);
        let Some(first) = matches.next() else {
            return Err(RecordStoreError::NotFound { id });
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(RecordStoreError::AmbiguousIdentifier {
                id,
                matches: extra + 1,
            });
        }
        Ok(first.clone())
    }

    async fn update(
        &self,
        id: Uuid,
        update: &HandbookUpdate,
    ) -> Result<HandbookRecord, RecordStoreError> {
        let mut rows = self.lock()?;
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Err(RecordStoreError::NotFound { id });
        };

        if let Some(value) = &update.association_name {
            row.association_name = value.clone();
        }
        if let Some(value) = update.association_category {
            row.association_category = value;
        }
        if let Some(value) = &update.address {
            row.address = value.clone();
        }
        if let Some(value) = &update.zip_code {
            row.zip_code = Some(value.clone());
        }
        if let Some(value) = &update.city {
            row.city = Some(value.clone());
        }
        if let Some(value) = &update.contact_person {
            row.contact_person = Some(value.clone());
        }
        if let Some(value) = &update.contact_email {
            row.contact_email = Some(value.clone());
        }
        if let Some(value) = &update.contact_phone {
            row.contact_phone = Some(value.clone());
        }
        if let Some(value) = &update.customer_email {
            row.customer_email = value.clone();
        }
        if let Some(value) = &update.selected_sections {
            row.selected_sections = value.clone();
        }
        if let Some(value) = &update.custom_information {
            row.custom_information = Some(value.clone());
        }
        if let Some(value) = &update.logo_url {
            row.logo_url = Some(value.clone());
        }
        if let Some(value) = &update.pdf_url {
            row.pdf_url = Some(value.clone());
        }
        if let Some(value) = &update.site_url {
            row.site_url = Some(value.clone());
        }
        if let Some(value) = update.payment_status {
            row.payment_status = value;
        }
        if let Some(value) = &update.payment_id {
            row.payment_id = Some(value.clone());
        }

        row.version += 1;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<HandbookRecord>, RecordStoreError> {
        let rows = self.lock()?;
        let total = rows.len() as u64;

        // Reverse insertion order first so equal timestamps still list
        // newest-first, then let the stable sort order by creation time.
        let mut ordered: Vec<HandbookRecord> = rows.iter().rev().cloned().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let items = ordered
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(Page::new(items, total))
    }
}
