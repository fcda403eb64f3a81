//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! petty cash test suite.
//!
//! # Modules
//!
//! - `fixtures`: Seeded ledger books, standard accounts and common values
//! - `builders`: Builder patterns for batches and request bodies
//! - `assertions`: Custom assertion helpers for batches and ledger entries
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
