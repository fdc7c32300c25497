//! Shared test utilities for civic integration tests.
//!
//! - `TestHarness` owns a temporary database and builds sessions against it
//! - builders and scripted collaborators for driving the wizard

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
