//! Structured logging facility for NodeStore
//!
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use nodestore_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! ## Logging ownership
//!
//! The store gateway and the migration runner own lifecycle logging for the
//! operations they expose. Drivers below them use plain `tracing::debug!`.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
