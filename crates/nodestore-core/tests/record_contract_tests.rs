// Integration tests for the record contract
// Covers decode/encode symmetry, required-field reporting and per-type id policy

use nodestore_core::{
    verify_contract, Contact, DecodeError, Identifier, Post, Record, Value, ValueKind,
};
use proptest::prelude::*;

#[test]
fn test_decode_contact_missing_email() {
    // Given: a value with only a name
    let value = Value::mapping([("name", Value::from("Ada"))]);

    // When: decoded as a Contact
    let result = Contact::decode(&value);

    // Then: the missing key is named
    assert_eq!(result, Err(DecodeError::MissingField("email".to_string())));
}

#[test]
fn test_decode_contact_wrong_type() {
    let value = Value::mapping([
        ("name", Value::from("Ada")),
        ("email", Value::from(true)),
    ]);

    let err = Contact::decode(&value).unwrap_err();

    assert_eq!(
        err,
        DecodeError::TypeMismatch {
            field: "email".to_string(),
            expected: ValueKind::String,
            actual: ValueKind::Bool,
        }
    );
}

#[test]
fn test_decode_post_missing_content() {
    let value = Value::mapping([("id", Value::from("some-token"))]);
    assert_eq!(
        Post::decode(&value),
        Err(DecodeError::MissingField("content".to_string()))
    );
}

#[test]
fn test_decode_rejects_non_mapping() {
    let value = Value::Sequence(vec![Value::from("Ada")]);
    assert!(matches!(
        Contact::decode(&value),
        Err(DecodeError::TypeMismatch {
            expected: ValueKind::Mapping,
            actual: ValueKind::Sequence,
            ..
        })
    ));
}

#[test]
fn test_contact_and_post_contracts_verify() {
    let contacts = verify_contract::<Contact>().expect("contact schema matches encoding");
    let posts = verify_contract::<Post>().expect("post schema matches encoding");

    assert_eq!(contacts.entity(), "contacts");
    assert_eq!(posts.entity(), "posts");
}

#[test]
fn test_id_policies_differ_per_type() {
    assert!(Contact::new("Ada", "ada@example.org").id().is_none());
    assert!(matches!(
        Post::new("hello").id(),
        Some(Identifier::Token(_))
    ));
}

#[test]
fn test_decoded_records_are_never_existing() {
    let contact = Contact::new("Ada", "ada@example.org");
    let decoded = Contact::decode(&contact.encode()).unwrap();
    assert!(!decoded.exists());
}

proptest! {
    #[test]
    fn prop_contact_round_trip_keeps_business_fields(name in ".*", email in ".*") {
        let contact = Contact::new(name.clone(), email.clone());
        let decoded = Contact::decode(&contact.encode()).unwrap();
        prop_assert_eq!(decoded.name, name);
        prop_assert_eq!(decoded.email, email);
    }

    #[test]
    fn prop_post_round_trip_keeps_content_and_token(content in ".*") {
        let post = Post::new(content.clone());
        let decoded = Post::decode(&post.encode()).unwrap();
        prop_assert_eq!(&decoded.content, &content);
        prop_assert_eq!(decoded.id(), post.id());
    }
}
