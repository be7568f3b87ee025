//! Decimal helpers for scoring arithmetic

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;

/// Rounds to `dp` decimal places, ties to even
pub fn round_half_even(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
}

/// Converts a float into a decimal, rejecting NaN and infinities
pub fn decimal_from_f64(value: f64) -> Result<Decimal, CoreError> {
    Decimal::from_f64(value)
        .ok_or_else(|| CoreError::NumericConversion(format!("{value} is not representable as a decimal")))
}

/// Renders a decimal the way a float prints: trailing zeros dropped, but at
/// least one fractional digit (`0.70` -> `0.7`, `45` -> `45.0`)
pub fn float_label(value: Decimal) -> String {
    let normalized = value.normalize();
    if normalized.scale() == 0 {
        format!("{normalized:.1}")
    } else {
        normalized.to_string()
    }
}
