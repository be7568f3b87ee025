//! Core Kernel - Foundational types and utilities for the underwriting system
//!
//! This crate provides the building blocks shared by the decision engine and
//! the crates around it:
//! - Identifiers for applications and batch runs
//! - A clock abstraction and whole-year age arithmetic
//! - Decimal rounding and conversion helpers used by the scoring policy

pub mod identifiers;
pub mod temporal;
pub mod numeric;
pub mod error;

pub use identifiers::{ApplicationId, BatchRunId};
pub use temporal::{whole_years_between, Clock, FixedClock, SystemClock};
pub use numeric::{decimal_from_f64, float_label, round_half_even};
pub use error::CoreError;
