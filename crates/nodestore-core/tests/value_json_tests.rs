// Value <-> JSON through serde, the form the outer layers format records in

use nodestore_core::{Contact, Number, Record, Value};

#[test]
fn test_value_parses_from_json_payload() {
    let value: Value =
        serde_json::from_str(r#"{"content": "hi", "tags": ["a", 1, 2.5, null, true]}"#).unwrap();

    assert_eq!(value.get("content"), Some(&Value::from("hi")));
    let tags = value.get("tags").and_then(Value::as_sequence).unwrap();
    assert_eq!(tags[0], Value::from("a"));
    assert_eq!(tags[1], Value::Number(Number::Integer(1)));
    assert_eq!(tags[2], Value::Number(Number::Float(2.5)));
    assert_eq!(tags[3], Value::Null);
    assert_eq!(tags[4], Value::Bool(true));
}

#[test]
fn test_encoded_contact_serializes_as_plain_object() {
    let contact = Contact::new("Ada", "ada@example.org");

    let json = serde_json::to_value(contact.encode()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"name": "Ada", "email": "ada@example.org"})
    );
}

#[test]
fn test_json_round_trip_preserves_integers() {
    let value = Value::mapping([("id", Value::from(9_007_199_254_740_993_i64))]);
    let text = serde_json::to_string(&value).unwrap();
    let back: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(back, value);
}
