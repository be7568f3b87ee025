//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! underwriting test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built applicants, clocks and model artifacts
//! - `builders`: Builder pattern for applications with sensible defaults
//! - `estimators`: Stub probability estimators
//! - `assertions`: Custom assertion helpers for decision records
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod estimators;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use estimators::*;
pub use assertions::*;
pub use generators::*;
