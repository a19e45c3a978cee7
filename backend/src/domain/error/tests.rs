//! Tests for the domain error payload and its stable codes.

use rstest::rstest;
use serde_json::json;

use super::{Error, ErrorCode};

#[rstest]
#[case::validation(Error::validation("bad"), ErrorCode::Validation, "validation")]
#[case::not_found(Error::not_found("missing"), ErrorCode::NotFound, "not_found")]
#[case::storage(Error::storage("upload refused"), ErrorCode::Storage, "storage")]
#[case::persistence(Error::persistence("insert refused"), ErrorCode::Persistence, "persistence")]
#[case::internal(Error::internal("boom"), ErrorCode::Internal, "internal")]
fn constructors_set_code_and_wire_name(
    #[case] error: Error,
    #[case] code: ErrorCode,
    #[case] wire: &str,
) {
    assert_eq!(error.code(), code);
    assert_eq!(error.code().as_str(), wire);
}

#[rstest]
fn display_uses_the_message() {
    let error = Error::persistence("insert refused");
    assert_eq!(error.to_string(), "insert refused");
}

#[rstest]
fn details_are_absent_until_attached() {
    let error = Error::validation("missing required field: address");
    assert!(error.details().is_none());

    let error = error.with_details(json!({ "field": "address" }));
    assert_eq!(error.details(), Some(&json!({ "field": "address" })));
}

#[rstest]
fn serialises_codes_in_snake_case() {
    let error = Error::not_found("missing").with_details(json!({ "id": "abc" }));
    let value = serde_json::to_value(&error).expect("error serialises");
    assert_eq!(value["code"], json!("not_found"));
    assert_eq!(value["message"], json!("missing"));
    assert_eq!(value["details"], json!({ "id": "abc" }));
}

#[rstest]
fn omits_details_field_when_empty() {
    let value = serde_json::to_value(Error::internal("boom")).expect("error serialises");
    assert!(value.get("details").is_none());
}
