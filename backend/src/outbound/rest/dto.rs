//! DTOs for the hosted record store's REST dialect.
//!
//! The adapter decodes responses into transport rows first, then maps into
//! [`HandbookRecord`] in one pass. Column names follow the `handbooks`
//! table, which predates this service, so a few differ from the domain
//! names (`association_type` vs. association category).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AssociationCategory, HandbookDraft, HandbookRecord, HandbookUpdate, PaymentStatus,
    SectionSelection,
};

/// One row of the `handbooks` table as the store returns it.
#[derive(Debug, Deserialize)]
pub(super) struct HandbookRowDto {
    pub(super) id: Uuid,
    pub(super) created_at: DateTime<Utc>,
    pub(super) updated_at: DateTime<Utc>,
    pub(super) association_name: String,
    pub(super) association_type: AssociationCategory,
    #[serde(default)]
    pub(super) address: Option<String>,
    pub(super) zip_code: Option<String>,
    pub(super) city: Option<String>,
    pub(super) contact_person: Option<String>,
    pub(super) contact_email: Option<String>,
    pub(super) contact_phone: Option<String>,
    pub(super) customer_email: String,
    #[serde(default)]
    pub(super) selected_sections: Option<Vec<String>>,
    pub(super) custom_information: Option<String>,
    pub(super) logo_url: Option<String>,
    pub(super) pdf_url: Option<String>,
    pub(super) site_url: Option<String>,
    pub(super) payment_status: PaymentStatus,
    pub(super) payment_id: Option<String>,
    pub(super) version: i64,
}

impl HandbookRowDto {
    /// Map a transport row into the domain record.
    ///
    /// Section keys outside the catalog make the row undecodable; a null
    /// section column reads as the empty selection, and a null address as
    /// the empty string (legacy rows predate the mandatory-field rule).
    pub(super) fn into_domain(self) -> Result<HandbookRecord, String> {
        let selected_sections = match self.selected_sections {
            Some(keys) => SectionSelection::from_keys(keys)
                .map_err(|error| format!("row {}: {error}", self.id))?,
            None => SectionSelection::empty(),
        };
        Ok(HandbookRecord {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            association_name: self.association_name,
            association_category: self.association_type,
            address: self.address.unwrap_or_default(),
            zip_code: self.zip_code,
            city: self.city,
            contact_person: self.contact_person,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            customer_email: self.customer_email,
            selected_sections,
            custom_information: self.custom_information,
            logo_url: self.logo_url,
            pdf_url: self.pdf_url,
            site_url: self.site_url,
            payment_status: self.payment_status,
            payment_id: self.payment_id,
            version: self.version,
        })
    }
}

/// Insert payload: every client-writable column, with the store left to
/// assign identifier, timestamps, and version.
#[derive(Debug, Serialize)]
pub(super) struct InsertRowDto<'a> {
    association_name: &'a str,
    association_type: AssociationCategory,
    address: &'a str,
    zip_code: Option<&'a str>,
    city: Option<&'a str>,
    contact_person: Option<&'a str>,
    contact_email: Option<&'a str>,
    contact_phone: Option<&'a str>,
    customer_email: &'a str,
    selected_sections: Vec<&'static str>,
    custom_information: Option<&'a str>,
    logo_url: Option<&'a str>,
    pdf_url: Option<&'a str>,
    site_url: Option<&'a str>,
    payment_status: PaymentStatus,
    payment_id: Option<&'a str>,
}

impl<'a> From<&'a HandbookDraft> for InsertRowDto<'a> {
    fn from(draft: &'a HandbookDraft) -> Self {
        Self {
            association_name: &draft.association_name,
            association_type: draft.association_category,
            address: &draft.address,
            zip_code: draft.zip_code.as_deref(),
            city: draft.city.as_deref(),
            contact_person: draft.contact_person.as_deref(),
            contact_email: draft.contact_email.as_deref(),
            contact_phone: draft.contact_phone.as_deref(),
            customer_email: &draft.customer_email,
            selected_sections: draft.selected_sections.keys(),
            custom_information: draft.custom_information.as_deref(),
            logo_url: draft.logo_url.as_deref(),
            pdf_url: None,
            site_url: None,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
        }
    }
}

/// Partial update payload: only the columns the caller set are serialised,
/// so untouched columns keep their stored values.
#[derive(Debug, Serialize)]
pub(super) struct UpdateRowDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    association_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    association_type: Option<AssociationCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    zip_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_person: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contact_phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_sections: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_information: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pdf_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    site_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_id: Option<&'a str>,
}

impl<'a> From<&'a HandbookUpdate> for UpdateRowDto<'a> {
    fn from(update: &'a HandbookUpdate) -> Self {
        Self {
            association_name: update.association_name.as_deref(),
            association_type: update.association_category,
            address: update.address.as_deref(),
            zip_code: update.zip_code.as_deref(),
            city: update.city.as_deref(),
            contact_person: update.contact_person.as_deref(),
            contact_email: update.contact_email.as_deref(),
            contact_phone: update.contact_phone.as_deref(),
            customer_email: update.customer_email.as_deref(),
            selected_sections: update
                .selected_sections
                .as_ref()
                .map(SectionSelection::keys),
            custom_information: update.custom_information.as_deref(),
            logo_url: update.logo_url.as_deref(),
            pdf_url: update.pdf_url.as_deref(),
            site_url: update.site_url.as_deref(),
            payment_status: update.payment_status,
            payment_id: update.payment_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Mapping coverage between transport rows and domain types.

    use serde_json::json;

    use super::*;
    use crate::domain::{AssociationCategory, BasicInfo, Section};

    fn row_json() -> serde_json::Value {
        json!({
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "created_at": "2026-03-01T09:00:00Z",
            "updated_at": "2026-03-01T09:00:00Z",
            "association_name": "Brf Solhöjden",
            "association_type": "brf",
            "address": "Exempelgatan 1",
            "zip_code": null,
            "city": null,
            "contact_person": null,
            "contact_email": null,
            "contact_phone": null,
            "customer_email": "a@b.se",
            "selected_sections": ["intro", "rules"],
            "custom_information": null,
            "logo_url": null,
            "pdf_url": null,
            "site_url": null,
            "payment_status": "pending",
            "payment_id": null,
            "version": 1
        })
    }

    #[test]
    fn decodes_a_store_row_into_the_domain_record() {
        let dto: HandbookRowDto =
            serde_json::from_value(row_json()).expect("row decodes");
        let record = dto.into_domain().expect("row maps");

        assert_eq!(record.association_name, "Brf Solhöjden");
        assert_eq!(
            record.association_category,
            AssociationCategory::HousingCooperative
        );
        assert_eq!(record.selected_sections.keys(), vec!["intro", "rules"]);
        assert_eq!(record.version, 1);
    }

    #[test]
    fn null_sections_read_as_the_empty_selection() {
        let mut value = row_json();
        value["selected_sections"] = json!(null);
        let dto: HandbookRowDto = serde_json::from_value(value).expect("row decodes");
        let record = dto.into_domain().expect("row maps");
        assert!(record.selected_sections.is_empty());
    }

    #[test]
    fn unknown_section_keys_make_the_row_undecodable() {
        let mut value = row_json();
        value["selected_sections"] = json!(["intro", "payments"]);
        let dto: HandbookRowDto = serde_json::from_value(value).expect("row decodes");
        assert!(dto.into_domain().is_err());
    }

    #[test]
    fn insert_payload_carries_pending_status_and_section_keys() {
        let basic = BasicInfo {
            association_name: "Brf Solhöjden".to_owned(),
            address: "Exempelgatan 1".to_owned(),
            customer_email: "a@b.se".to_owned(),
            ..BasicInfo::default()
        };
        let draft = HandbookDraft::new(
            basic,
            crate::domain::SectionSelection::new([Section::Intro]),
            None,
            None,
        )
        .expect("fixture draft is valid");

        let value = serde_json::to_value(InsertRowDto::from(&draft)).expect("payload serialises");
        assert_eq!(value["payment_status"], json!("pending"));
        assert_eq!(value["selected_sections"], json!(["intro"]));
        assert_eq!(value["payment_id"], json!(null));
        assert!(value.get("id").is_none(), "the store assigns the identifier");
        assert!(value.get("version").is_none(), "the store owns the version");
    }

    #[test]
    fn update_payload_only_serialises_set_fields() {
        let update = HandbookUpdate {
            contact_email: Some("styrelsen@example.com".to_owned()),
            ..HandbookUpdate::default()
        };
        let value = serde_json::to_value(UpdateRowDto::from(&update)).expect("payload serialises");

        assert_eq!(value["contact_email"], json!("styrelsen@example.com"));
        assert_eq!(
            value.as_object().map(serde_json::Map::len),
            Some(1),
            "unset fields must stay off the wire"
        );
    }
}
