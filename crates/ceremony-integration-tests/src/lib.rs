//! Integration test crate for the guardian key ceremony.
//!
//! This crate has no library code. It only contains integration tests
//! that drive real guardians through the mediator across workspace crates.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p ceremony-integration-tests
//! ```
