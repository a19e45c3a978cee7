//! Shared request/response DTOs for the handbook endpoints.
//!
//! Request bodies parse into domain types here so the order workflow and
//! the administrative probes share one strongly-typed path; there is no
//! loosely-typed payload anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AssociationCategory, BasicInfo, Error, HandbookRecord, PaymentStatus, Section,
    SectionSelection, MAX_CUSTOM_INFORMATION_CHARS,
};
use crate::domain::ports::{ObjectMetadata, StoredObject};
use crate::server::config::ProductInfo;

/// Association details collected in the first workflow step.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfoBody {
    /// Association display name.
    #[schema(example = "Brf Solhöjden")]
    pub association_name: String,
    /// Association category key: `brf`, `samfallighet`, or `forening`.
    #[serde(default)]
    #[schema(example = "brf")]
    pub association_type: Option<String>,
    /// Street address.
    #[schema(example = "Exempelgatan 1")]
    pub address: String,
    /// Postal code.
    pub zip_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Contact person name.
    pub contact_person: Option<String>,
    /// Contact email address.
    pub contact_email: Option<String>,
    /// Contact phone number.
    pub contact_phone: Option<String>,
    /// Customer email used for delivery and invoicing.
    #[schema(example = "a@b.se")]
    pub customer_email: String,
}

impl BasicInfoBody {
    /// Parse into the domain type; the workflow guard performs the
    /// mandatory-field validation itself.
    pub fn into_domain(self) -> Result<BasicInfo, Error> {
        let association_category = match self.association_type.as_deref() {
            None => AssociationCategory::default(),
            Some(key) => AssociationCategory::from_key(key).ok_or_else(|| {
                Error::validation(format!("unknown association category: {key}"))
                    .with_details(json!({ "field": "associationType", "value": key }))
            })?,
        };
        Ok(BasicInfo {
            association_name: self.association_name,
            association_category,
            address: self.address,
            zip_code: none_if_blank(self.zip_code),
            city: none_if_blank(self.city),
            contact_person: none_if_blank(self.contact_person),
            contact_email: none_if_blank(self.contact_email),
            contact_phone: none_if_blank(self.contact_phone),
            customer_email: self.customer_email,
        })
    }

    fn from_domain(info: &BasicInfo) -> Self {
        Self {
            association_name: info.association_name.clone(),
            association_type: Some(info.association_category.key().to_owned()),
            address: info.address.clone(),
            zip_code: info.zip_code.clone(),
            city: info.city.clone(),
            contact_person: info.contact_person.clone(),
            contact_email: info.contact_email.clone(),
            contact_phone: info.contact_phone.clone(),
            customer_email: info.customer_email.clone(),
        }
    }
}

impl From<&BasicInfo> for BasicInfoBody {
    fn from(info: &BasicInfo) -> Self {
        Self::from_domain(info)
    }
}

/// Parse raw section keys into a validated selection.
pub fn parse_sections(keys: Vec<String>) -> Result<SectionSelection, Error> {
    SectionSelection::from_keys(keys)
}

/// Validate the free-text notes against the draft size bound.
pub fn parse_custom_information(value: Option<String>) -> Result<Option<String>, Error> {
    match none_if_blank(value) {
        Some(notes) if notes.chars().count() > MAX_CUSTOM_INFORMATION_CHARS => Err(
            Error::validation(format!(
                "custom information exceeds {MAX_CUSTOM_INFORMATION_CHARS} characters"
            ))
            .with_details(json!({ "field": "customInformation" })),
        ),
        other => Ok(other),
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// One selected section with its display label.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionBody {
    /// Stable catalog key.
    #[schema(example = "intro")]
    pub key: String,
    /// Swedish display label.
    #[schema(example = "Introduktion och välkomstinformation")]
    pub label: String,
}

impl From<Section> for SectionBody {
    fn from(section: Section) -> Self {
        Self {
            key: section.key().to_owned(),
            label: section.label().to_owned(),
        }
    }
}

/// A handbook order as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HandbookBody {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Association display name.
    pub association_name: String,
    /// Association category key.
    #[schema(example = "brf")]
    pub association_type: String,
    /// Street address.
    pub address: String,
    /// Postal code.
    pub zip_code: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Contact person name.
    pub contact_person: Option<String>,
    /// Contact email address.
    pub contact_email: Option<String>,
    /// Contact phone number.
    pub contact_phone: Option<String>,
    /// Customer email used for delivery and invoicing.
    pub customer_email: String,
    /// Selected sections with display labels.
    pub selected_sections: Vec<SectionBody>,
    /// Customer-supplied free-text notes.
    pub custom_information: Option<String>,
    /// Public logo URL, when one was uploaded.
    pub logo_url: Option<String>,
    /// Generated-document reference.
    pub pdf_url: Option<String>,
    /// Published-site reference.
    pub site_url: Option<String>,
    /// Payment lifecycle state.
    #[schema(example = "pending")]
    pub payment_status: String,
    /// Payment reference identifier.
    pub payment_id: Option<String>,
    /// Store-maintained version counter.
    pub version: i64,
}

impl From<HandbookRecord> for HandbookBody {
    fn from(record: HandbookRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            association_name: record.association_name,
            association_type: record.association_category.key().to_owned(),
            address: record.address,
            zip_code: record.zip_code,
            city: record.city,
            contact_person: record.contact_person,
            contact_email: record.contact_email,
            contact_phone: record.contact_phone,
            customer_email: record.customer_email,
            selected_sections: record
                .selected_sections
                .sections()
                .iter()
                .copied()
                .map(SectionBody::from)
                .collect(),
            custom_information: record.custom_information,
            logo_url: record.logo_url,
            pdf_url: record.pdf_url,
            site_url: record.site_url,
            payment_status: record.payment_status.as_str().to_owned(),
            payment_id: record.payment_id,
            version: record.version,
        }
    }
}

/// Parse a payment status key from a request body.
pub fn parse_payment_status(key: &str) -> Result<PaymentStatus, Error> {
    match key {
        "pending" => Ok(PaymentStatus::Pending),
        "processing" => Ok(PaymentStatus::Processing),
        "completed" => Ok(PaymentStatus::Completed),
        "failed" => Ok(PaymentStatus::Failed),
        other => Err(
            Error::validation(format!("unknown payment status: {other}"))
                .with_details(json!({ "field": "status", "value": other })),
        ),
    }
}

/// Result of an object upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredObjectBody {
    /// Path of the object inside the bucket.
    pub path: String,
    /// Publicly resolvable retrieval URL.
    pub url: String,
}

impl From<StoredObject> for StoredObjectBody {
    fn from(stored: StoredObject) -> Self {
        Self {
            path: stored.path,
            url: stored.url,
        }
    }
}

/// Metadata for one stored object.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadataBody {
    /// Object name as the backend reports it.
    pub name: String,
    /// Size in bytes.
    pub size: Option<u64>,
    /// Content type.
    pub content_type: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ObjectMetadata> for ObjectMetadataBody {
    fn from(meta: ObjectMetadata) -> Self {
        Self {
            name: meta.name,
            size: meta.size,
            content_type: meta.content_type,
            created_at: meta.created_at,
        }
    }
}

/// Product display data shown alongside the order summary.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    /// Product display name.
    #[schema(example = "Föreningshandboken")]
    pub name: String,
    /// Price in the product currency's main unit.
    #[schema(example = 299)]
    pub price: u32,
    /// ISO 4217-style currency key, lowercase.
    #[schema(example = "sek")]
    pub currency: String,
}

impl From<&ProductInfo> for ProductBody {
    fn from(product: &ProductInfo) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            currency: product.currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for request parsing at the DTO boundary.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    fn body() -> BasicInfoBody {
        BasicInfoBody {
            association_name: "Brf Solhöjden".to_owned(),
            association_type: Some("brf".to_owned()),
            address: "Exempelgatan 1".to_owned(),
            zip_code: Some(String::new()),
            city: None,
            contact_person: None,
            contact_email: None,
            contact_phone: None,
            customer_email: "a@b.se".to_owned(),
        }
    }

    #[rstest]
    fn blank_optionals_normalise_to_none() {
        let info = body().into_domain().expect("body parses");
        assert!(info.zip_code.is_none());
        assert_eq!(
            info.association_category,
            AssociationCategory::HousingCooperative
        );
    }

    #[rstest]
    fn missing_category_defaults_to_housing_cooperative() {
        let mut raw = body();
        raw.association_type = None;
        let info = raw.into_domain().expect("body parses");
        assert_eq!(
            info.association_category,
            AssociationCategory::HousingCooperative
        );
    }

    #[rstest]
    fn unknown_category_key_is_a_validation_error() {
        let mut raw = body();
        raw.association_type = Some("kommun".to_owned());
        let error = raw.into_domain().expect_err("unknown key must fail");
        assert_eq!(error.code(), ErrorCode::Validation);
    }

    #[rstest]
    fn oversized_notes_are_rejected_at_the_boundary() {
        let error = parse_custom_information(Some("x".repeat(MAX_CUSTOM_INFORMATION_CHARS + 1)))
            .expect_err("bound must hold");
        assert_eq!(error.code(), ErrorCode::Validation);
    }

    #[rstest]
    fn blank_notes_normalise_to_none() {
        assert_eq!(parse_custom_information(Some("  ".to_owned())).expect("blank is fine"), None);
    }

    #[rstest]
    #[case("pending", PaymentStatus::Pending)]
    #[case("completed", PaymentStatus::Completed)]
    fn payment_status_keys_parse(#[case] key: &str, #[case] expected: PaymentStatus) {
        assert_eq!(parse_payment_status(key).expect("key parses"), expected);
    }

    #[rstest]
    fn unknown_payment_status_is_a_validation_error() {
        let error = parse_payment_status("refunded").expect_err("unknown key must fail");
        assert_eq!(error.code(), ErrorCode::Validation);
    }
}
