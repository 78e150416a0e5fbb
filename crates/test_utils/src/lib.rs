//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! contract billing test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Scenario builders wiring contracts to their directory records
//! - `stores`: In-memory port adapters for driver tests
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod stores;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use stores::*;
pub use assertions::*;
pub use generators::*;
