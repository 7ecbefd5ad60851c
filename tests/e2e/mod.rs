//! End-to-end tests for section-store.
//!
//! Everything runs against real codecs and temporary files; no test needs
//! network access or a user config directory.

pub mod registry_tests;
pub mod servlet_tests;
pub mod store_tests;
