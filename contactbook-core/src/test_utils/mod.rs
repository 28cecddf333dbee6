//! Test utilities
//!
//! Fixtures shared by unit tests, integration tests and the CLI tests.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
