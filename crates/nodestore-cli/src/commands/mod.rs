pub mod contacts;
pub mod migrate;
pub mod posts;
pub mod version;

use nodestore_core::Value;

/// Print a value to stdout as one line of JSON
pub(crate) fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// `{"<key>": [...]}`
pub(crate) fn listing(key: &str, items: Vec<Value>) -> Value {
    Value::mapping([(key, Value::Sequence(items))])
}
