//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the emitting macros
//! and anything that reads the events back.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Record/table identifiers
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_RECORD_ID: &str = "record_id";
pub const FIELD_MIGRATION_ID: &str = "migration_id";

// Collection sizes
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
