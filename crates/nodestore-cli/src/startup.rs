//! Startup sequence: open, migrate, hand out the gateway

use nodestore_core::{Contact, Post, SchemaError};
use nodestore_store::{run_migrations, Migrations, SqliteDriver, StoreGateway};

/// Every record type the application persists, in creation order
pub fn migrations() -> Result<Migrations, SchemaError> {
    Migrations::new().register::<Contact>()?.register::<Post>()
}

/// Open the database and apply pending migrations
///
/// Any failure here is fatal; no command runs against a half-migrated store.
pub fn open_gateway(db: &str) -> Result<StoreGateway, Box<dyn std::error::Error>> {
    tracing::debug!(db, "opening database");
    let driver = SqliteDriver::open(db)?;
    run_migrations(&migrations()?, &driver)?;
    Ok(StoreGateway::new(driver))
}
