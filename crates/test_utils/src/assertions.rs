//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for decision records that give
//! more meaningful error messages than standard assertions.

use domain_underwriting::{Decision, DecisionRecord, RiskSource};
use rust_decimal::Decimal;

/// Asserts the status and final score of a decision
///
/// # Panics
///
/// Panics with the full reason list if either differs
pub fn assert_decision(record: &DecisionRecord, status: Decision, final_score: Decimal) {
    assert_eq!(
        record.status(),
        status,
        "Unexpected status for {}: score={}, reasons={:?}",
        record.application_id(),
        record.final_score(),
        record.reasons()
    );
    assert_eq!(
        record.final_score(),
        final_score,
        "Unexpected final score for {}: reasons={:?}",
        record.application_id(),
        record.reasons()
    );
}

/// Asserts the exact reason list, in order
pub fn assert_reasons_eq(record: &DecisionRecord, expected: &[&str]) {
    let actual: Vec<&str> = record.reasons().iter().map(String::as_str).collect();
    assert_eq!(
        actual,
        expected,
        "Reason mismatch for {}",
        record.application_id()
    );
}

/// Asserts that the decision was made without consulting the model
pub fn assert_rule_engine_only(record: &DecisionRecord) {
    assert_eq!(
        record.risk_source(),
        RiskSource::RuleEngine,
        "Expected a rule-only decision for {}",
        record.application_id()
    );
    assert!(
        record.breakdown().is_none(),
        "Rule-only decision for {} carries a score breakdown",
        record.application_id()
    );
}
