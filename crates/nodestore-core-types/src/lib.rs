//! Core types shared across NodeStore facilities
//!
//! - **Schema constants**: canonical field keys and event names used by the
//!   logging macros and by tests that assert on captured events

pub mod schema;
