//! Handbook order entities: the persisted record, the insert draft, and the
//! typed partial update.
//!
//! The record store owns identifier, timestamps, and the version counter.
//! Those fields exist only on [`HandbookRecord`]; [`HandbookDraft`] and
//! [`HandbookUpdate`] cannot express them, which keeps the server-assigned
//! invariants unrepresentable on the client side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::sections::SectionSelection;
use super::Error;

/// Upper bound on the free-text notes so the session-stored draft stays
/// within the cookie size limit.
pub const MAX_CUSTOM_INFORMATION_CHARS: usize = 2000;

/// Closed set of association categories a handbook can be ordered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociationCategory {
    /// Bostadsrättsförening.
    #[serde(rename = "brf")]
    HousingCooperative,
    /// Samfällighet.
    #[serde(rename = "samfallighet")]
    JointFacility,
    /// Allmän förening.
    #[serde(rename = "forening")]
    Association,
}

impl AssociationCategory {
    /// Stable key used on the wire and in the record store.
    pub const fn key(self) -> &'static str {
        match self {
            Self::HousingCooperative => "brf",
            Self::JointFacility => "samfallighet",
            Self::Association => "forening",
        }
    }

    /// Swedish display label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::HousingCooperative => "Bostadsrättsförening",
            Self::JointFacility => "Samfällighet",
            Self::Association => "Förening",
        }
    }

    /// Resolve a category key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "brf" => Some(Self::HousingCooperative),
            "samfallighet" => Some(Self::JointFacility),
            "forening" => Some(Self::Association),
            _ => None,
        }
    }
}

impl Default for AssociationCategory {
    fn default() -> Self {
        Self::HousingCooperative
    }
}

impl std::fmt::Display for AssociationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Payment lifecycle of an order.
///
/// A record is created as [`PaymentStatus::Pending`]; only the external
/// payment-completion process moves it further (together with the payment
/// reference identifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting a payment event.
    Pending,
    /// A payment is underway.
    Processing,
    /// Payment settled.
    Completed,
    /// Payment attempt failed.
    Failed,
}

impl PaymentStatus {
    /// Stable key used on the wire and in the record store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The association details collected in the first workflow step.
///
/// Stored as-is in the session between steps; the workflow guard calls
/// [`BasicInfo::validate`] before advancing past it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    /// Association display name (required).
    pub association_name: String,
    /// Category of the association.
    pub association_category: AssociationCategory,
    /// Street address (required).
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
    /// Customer email used for delivery and invoicing (required).
    pub customer_email: String,
}

impl BasicInfo {
    /// Check the mandatory fields: association name, address, and customer
    /// email must all be non-empty once trimmed.
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] naming the first missing field.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("associationName", &self.association_name),
            ("address", &self.address),
            ("customerEmail", &self.customer_email),
        ] {
            if value.trim().is_empty() {
                return Err(
                    Error::validation(format!("missing required field: {field}"))
                        .with_details(json!({ "field": field })),
                );
            }
        }
        Ok(())
    }
}

/// A persisted handbook order as the record store returns it.
///
/// Identifier, timestamps, and version are assigned by the store; the
/// version counter increases on every update and never decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandbookRecord {
    /// Store-assigned identifier, immutable once assigned.
    pub id: Uuid,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Store-assigned last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Association display name.
    pub association_name: String,
    /// Association category.
    pub association_category: AssociationCategory,
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
    /// Chapter topics included in this order.
    pub selected_sections: SectionSelection,
    /// Customer-supplied free-text notes.
    pub custom_information: Option<String>,
    /// Public URL of the uploaded logo, when one was provided.
    pub logo_url: Option<String>,
    /// Reference to the generated document, populated outside this core.
    pub pdf_url: Option<String>,
    /// Reference to the published site, populated outside this core.
    pub site_url: Option<String>,
    /// Payment lifecycle state.
    pub payment_status: PaymentStatus,
    /// Payment reference identifier, set once a payment event is recorded.
    pub payment_id: Option<String>,
    /// Store-maintained monotonic version counter.
    pub version: i64,
}

/// Validated insert payload for a new handbook order.
///
/// Constructed through [`HandbookDraft::new`], which enforces the mandatory
/// fields and a non-empty section selection; the payment status is always
/// `pending` and the delivery references start unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandbookDraft {
    pub(crate) association_name: String,
    pub(crate) association_category: AssociationCategory,
    pub(crate) address: String,
    pub(crate) zip_code: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) contact_person: Option<String>,
    pub(crate) contact_email: Option<String>,
    pub(crate) contact_phone: Option<String>,
    pub(crate) customer_email: String,
    pub(crate) selected_sections: SectionSelection,
    pub(crate) custom_information: Option<String>,
    pub(crate) logo_url: Option<String>,
}

impl HandbookDraft {
    /// Assemble a draft from the validated workflow pieces.
    ///
    /// # Errors
    ///
    /// Returns a validation [`Error`] when a mandatory field is empty, the
    /// section selection is empty, or the notes exceed
    /// [`MAX_CUSTOM_INFORMATION_CHARS`].
    pub fn new(
        basic: BasicInfo,
        sections: SectionSelection,
        custom_information: Option<String>,
        logo_url: Option<String>,
    ) -> Result<Self, Error> {
        basic.validate()?;
        if sections.is_empty() {
            return Err(Error::validation(
                "at least one handbook section must be selected",
            )
            .with_details(json!({ "field": "selectedSections" })));
        }
        if let Some(notes) = &custom_information {
            if notes.chars().count() > MAX_CUSTOM_INFORMATION_CHARS {
                return Err(Error::validation(format!(
                    "custom information exceeds {MAX_CUSTOM_INFORMATION_CHARS} characters"
                ))
                .with_details(json!({ "field": "customInformation" })));
            }
        }
        Ok(Self {
            association_name: basic.association_name,
            association_category: basic.association_category,
            address: basic.address,
            zip_code: basic.zip_code,
            city: basic.city,
            contact_person: basic.contact_person,
            contact_email: basic.contact_email,
            contact_phone: basic.contact_phone,
            customer_email: basic.customer_email,
            selected_sections: sections,
            custom_information,
            logo_url,
        })
    }

    /// Association display name.
    pub fn association_name(&self) -> &str {
        &self.association_name
    }

    /// Customer email used for delivery and invoicing.
    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    /// Chapter topics included in this order.
    pub const fn selected_sections(&self) -> &SectionSelection {
        &self.selected_sections
    }

    /// Public URL of the uploaded logo, when one was provided.
    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }
}

/// Typed partial update for a handbook order.
///
/// Carries only fields a caller may legitimately change; identifier,
/// timestamps, and version have no representation here and therefore can
/// never be set by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandbookUpdate {
    /// Replacement association name.
    pub association_name: Option<String>,
    /// Replacement association category.
    pub association_category: Option<AssociationCategory>,
    /// Replacement street address.
    pub address: Option<String>,
    /// Replacement postal code.
    pub zip_code: Option<String>,
    /// Replacement city.
    pub city: Option<String>,
    /// Replacement contact person.
    pub contact_person: Option<String>,
    /// Replacement contact email.
    pub contact_email: Option<String>,
    /// Replacement contact phone.
    pub contact_phone: Option<String>,
    /// Replacement customer email.
    pub customer_email: Option<String>,
    /// Replacement section selection.
    pub selected_sections: Option<SectionSelection>,
    /// Replacement free-text notes.
    pub custom_information: Option<String>,
    /// Replacement logo reference.
    pub logo_url: Option<String>,
    /// Generated-document reference, populated by external processing.
    pub pdf_url: Option<String>,
    /// Published-site reference, populated by external processing.
    pub site_url: Option<String>,
    /// Payment lifecycle state, set by the payment-completion process.
    pub payment_status: Option<PaymentStatus>,
    /// Payment reference identifier, set by the payment-completion process.
    pub payment_id: Option<String>,
}

impl HandbookUpdate {
    /// A partial update recording a payment event.
    pub fn payment_event(payment_id: impl Into<String>, status: PaymentStatus) -> Self {
        Self {
            payment_id: Some(payment_id.into()),
            payment_status: Some(status),
            ..Self::default()
        }
    }

    /// Whether the update carries no field at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests;
