//! SQLite implementation of the driver boundary

pub mod hydration;
pub mod sqlite_driver;

pub use sqlite_driver::SqliteDriver;
