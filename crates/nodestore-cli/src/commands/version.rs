//! Version probe through the raw query pass-through

use nodestore_store::StoreGateway;

use super::print_json;

const VERSION_QUERY: &str = "SELECT sqlite_version() AS version";

/// Print the first row of the version query, e.g. `{"version":"3.41.2"}`
pub fn execute(gateway: &StoreGateway) -> Result<(), Box<dyn std::error::Error>> {
    let result = gateway.raw_query(VERSION_QUERY)?;
    let row = result
        .as_sequence()
        .and_then(|rows| rows.first())
        .ok_or("version query returned no rows")?;
    print_json(row)
}
