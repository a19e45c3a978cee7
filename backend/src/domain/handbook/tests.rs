//! Regression coverage for handbook entities and their validation.

use rstest::rstest;

use super::{
    AssociationCategory, BasicInfo, HandbookDraft, HandbookUpdate, PaymentStatus,
};
use crate::domain::sections::{Section, SectionSelection};
use crate::domain::ErrorCode;

fn basic_info() -> BasicInfo {
    BasicInfo {
        association_name: "Brf Solhöjden".to_owned(),
        association_category: AssociationCategory::HousingCooperative,
        address: "Exempelgatan 1".to_owned(),
        zip_code: Some("123 45".to_owned()),
        city: Some("Stockholm".to_owned()),
        contact_person: Some("Anna Andersson".to_owned()),
        contact_email: Some("kontakt@example.com".to_owned()),
        contact_phone: None,
        customer_email: "a@b.se".to_owned(),
    }
}

fn sections() -> SectionSelection {
    SectionSelection::new([Section::Intro, Section::Rules])
}

#[rstest]
fn valid_basic_info_passes_the_guard() {
    assert!(basic_info().validate().is_ok());
}

#[rstest]
#[case::association_name(|info: &mut BasicInfo| info.association_name.clear(), "associationName")]
#[case::address(|info: &mut BasicInfo| info.address = "   ".to_owned(), "address")]
#[case::customer_email(|info: &mut BasicInfo| info.customer_email.clear(), "customerEmail")]
fn missing_mandatory_fields_are_rejected(
    #[case] corrupt: fn(&mut BasicInfo),
    #[case] field: &str,
) {
    let mut info = basic_info();
    corrupt(&mut info);

    let error = info.validate().expect_err("mandatory field must be present");
    assert_eq!(error.code(), ErrorCode::Validation);
    assert_eq!(
        error.details().and_then(|details| details.get("field")),
        Some(&serde_json::json!(field))
    );
}

#[rstest]
fn draft_assembles_from_validated_pieces() {
    let draft = HandbookDraft::new(basic_info(), sections(), None, None)
        .expect("valid pieces assemble into a draft");

    assert_eq!(draft.association_name(), "Brf Solhöjden");
    assert_eq!(draft.customer_email(), "a@b.se");
    assert_eq!(draft.selected_sections().keys(), vec!["intro", "rules"]);
    assert!(draft.logo_url().is_none());
}

#[rstest]
fn draft_rejects_empty_section_selection() {
    let error = HandbookDraft::new(basic_info(), SectionSelection::empty(), None, None)
        .expect_err("empty selection must be rejected");
    assert_eq!(error.code(), ErrorCode::Validation);
}

#[rstest]
fn draft_rejects_oversized_notes() {
    let notes = "x".repeat(super::MAX_CUSTOM_INFORMATION_CHARS + 1);
    let error = HandbookDraft::new(basic_info(), sections(), Some(notes), None)
        .expect_err("oversized notes must be rejected");
    assert_eq!(error.code(), ErrorCode::Validation);
}

#[rstest]
#[case(AssociationCategory::HousingCooperative, "brf")]
#[case(AssociationCategory::JointFacility, "samfallighet")]
#[case(AssociationCategory::Association, "forening")]
fn category_keys_round_trip(#[case] category: AssociationCategory, #[case] key: &str) {
    assert_eq!(category.key(), key);
    assert_eq!(AssociationCategory::from_key(key), Some(category));
}

#[rstest]
fn payment_statuses_serialise_in_snake_case() {
    for (status, wire) in [
        (PaymentStatus::Pending, "\"pending\""),
        (PaymentStatus::Processing, "\"processing\""),
        (PaymentStatus::Completed, "\"completed\""),
        (PaymentStatus::Failed, "\"failed\""),
    ] {
        let json = serde_json::to_string(&status).expect("status serialises");
        assert_eq!(json, wire);
    }
}

#[rstest]
fn payment_event_touches_only_payment_fields() {
    let update = HandbookUpdate::payment_event("pi_123", PaymentStatus::Completed);

    assert_eq!(update.payment_id.as_deref(), Some("pi_123"));
    assert_eq!(update.payment_status, Some(PaymentStatus::Completed));
    assert!(update.association_name.is_none());
    assert!(update.selected_sections.is_none());
    assert!(!update.is_empty());
}

#[rstest]
fn default_update_is_empty() {
    assert!(HandbookUpdate::default().is_empty());
}
