use custreg_core::model::customer::CUSTOMER_NAME_MAX_CHARS;
use custreg_core::{Customer, CustomerValidationError, PostalCode};

fn cep(raw: &str) -> PostalCode {
    PostalCode::parse(raw).unwrap()
}

#[test]
fn new_customer_is_unsaved_with_unresolved_address() {
    let customer = Customer::new("Ana", cep("01001000"));

    assert_eq!(customer.id, None);
    assert_eq!(customer.postal_code().as_str(), "01001-000");
    assert!(customer.address.city.is_empty());
    assert!(customer.validate().is_ok());
}

#[test]
fn validate_rejects_blank_and_oversized_names() {
    let blank = Customer::new(" \t ", cep("01001-000"));
    assert_eq!(
        blank.validate().unwrap_err(),
        CustomerValidationError::BlankName
    );

    let long = Customer::new("a".repeat(CUSTOMER_NAME_MAX_CHARS + 1), cep("01001-000"));
    assert_eq!(
        long.validate().unwrap_err(),
        CustomerValidationError::NameTooLong {
            max: CUSTOMER_NAME_MAX_CHARS,
            actual: CUSTOMER_NAME_MAX_CHARS + 1,
        }
    );
}

#[test]
fn deserialize_accepts_postal_code_only_input() {
    let value = serde_json::json!({
        "name": "Ana",
        "address": { "postal_code": "01001000" }
    });

    let customer: Customer = serde_json::from_value(value).unwrap();
    assert_eq!(customer.id, None);
    assert_eq!(customer.postal_code(), &cep("01001-000"));
    assert!(customer.address.street.is_empty());
}

#[test]
fn deserialize_rejects_malformed_postal_code() {
    let value = serde_json::json!({
        "name": "Ana",
        "address": { "postal_code": "0100-1000" }
    });

    let err = serde_json::from_value::<Customer>(value).unwrap_err();
    assert!(
        err.to_string().contains("malformed postal code"),
        "unexpected error: {err}"
    );
}

#[test]
fn serialize_uses_canonical_postal_code() {
    let json = serde_json::to_value(Customer::new("Ana", cep("01001000"))).unwrap();

    assert_eq!(json["address"]["postal_code"], "01001-000");
    assert_eq!(json["id"], serde_json::Value::Null);
}
