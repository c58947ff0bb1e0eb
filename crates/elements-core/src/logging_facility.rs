//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Structured operation macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use elements_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Cascade, seeding and publish operations emit one `start` and exactly one
//! `end` or `end_error` event each; recursion inside a cascade logs at debug
//! level only.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
