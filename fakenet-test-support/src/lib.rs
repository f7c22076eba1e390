//! Shared test utilities used across fakenet crates.

pub mod fixtures;
pub mod proptest_profile;
pub mod tracing;
