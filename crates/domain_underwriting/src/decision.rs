//! Underwriting decision record

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::ApplicationId;

/// Final underwriting verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accept,
    Reject,
    ManualReview,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Decision::Accept => "ACCEPT",
            Decision::Reject => "REJECT",
            Decision::ManualReview => "MANUAL_REVIEW",
        };
        f.write_str(label)
    }
}

/// Which stage produced the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskSource {
    /// Decided by the rules alone; the model was not consulted
    #[serde(rename = "Rule Engine")]
    RuleEngine,
    /// Rule score blended with the model score
    #[serde(rename = "Hybrid")]
    Hybrid,
}

/// Contributions blended into the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Rule-based score as blended
    pub rule: i64,
    /// Model probability scaled to 0-100, two decimal places
    #[serde(with = "rust_decimal::serde::float")]
    pub ai: Decimal,
}

/// Outcome of underwriting one application
///
/// Created once by the decision blender and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    application_id: ApplicationId,
    status: Decision,
    risk_source: RiskSource,
    #[serde(with = "rust_decimal::serde::float")]
    final_score: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    breakdown: Option<ScoreBreakdown>,
    reasons: Vec<String>,
    timestamp: DateTime<Utc>,
}

impl DecisionRecord {
    pub(crate) fn new(
        application_id: ApplicationId,
        status: Decision,
        risk_source: RiskSource,
        final_score: Decimal,
        breakdown: Option<ScoreBreakdown>,
        reasons: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            application_id,
            status,
            risk_source,
            final_score,
            breakdown,
            reasons,
            timestamp,
        }
    }

    pub fn application_id(&self) -> &ApplicationId {
        &self.application_id
    }

    pub fn status(&self) -> Decision {
        self.status
    }

    pub fn risk_source(&self) -> RiskSource {
        self.risk_source
    }

    pub fn final_score(&self) -> Decimal {
        self.final_score
    }

    pub fn breakdown(&self) -> Option<&ScoreBreakdown> {
        self.breakdown.as_ref()
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
