//! Hybrid decision blending
//!
//! Turns a [`RuleOutcome`] into a [`DecisionRecord`]:
//!
//! - knockout → REJECT at 100, the model is never consulted
//! - referral → MANUAL_REVIEW, the model is never consulted
//! - proceed  → `round(rule_weight·rule + model_weight·ai, 1)` mapped through
//!   the reject and review thresholds
//!
//! Weights and thresholds come from [`BlendPolicy`] and are tunable through
//! configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use core_kernel::{decimal_from_f64, float_label, round_half_even, Clock, SystemClock};

use crate::application::Application;
use crate::decision::{Decision, DecisionRecord, RiskSource, ScoreBreakdown};
use crate::error::UnderwritingError;
use crate::estimator::EstimatorHandle;
use crate::features::project;
use crate::rules::{RuleOutcome, KNOCKOUT_SCORE};

const MAX_SCORE: Decimal = dec!(100);

/// Blend weights and decision thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendPolicy {
    pub rule_weight: Decimal,
    pub model_weight: Decimal,
    /// Scores strictly above this are rejected
    pub reject_threshold: Decimal,
    /// Scores strictly above this (and not rejected) go to manual review
    pub review_threshold: Decimal,
    /// Clamp the rule score to 100 before blending
    pub clamp_rule_score: bool,
}

impl Default for BlendPolicy {
    fn default() -> Self {
        Self {
            rule_weight: dec!(0.4),
            model_weight: dec!(0.6),
            reject_threshold: dec!(75),
            review_threshold: dec!(40),
            clamp_rule_score: false,
        }
    }
}

impl BlendPolicy {
    /// Checks that the policy is coherent
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolicy` for negative weights, all-zero weights, or a
    /// review threshold that is not below the reject threshold
    pub fn validate(&self) -> Result<(), UnderwritingError> {
        if self.rule_weight < Decimal::ZERO || self.model_weight < Decimal::ZERO {
            return Err(UnderwritingError::invalid_policy("blend weights must not be negative"));
        }
        if (self.rule_weight + self.model_weight).is_zero() {
            return Err(UnderwritingError::invalid_policy("blend weights must not both be zero"));
        }
        if self.review_threshold >= self.reject_threshold {
            return Err(UnderwritingError::invalid_policy(format!(
                "review threshold {} must be below reject threshold {}",
                self.review_threshold, self.reject_threshold
            )));
        }
        Ok(())
    }

    /// Maps a blended score onto a decision
    pub fn classify(&self, final_score: Decimal) -> Decision {
        if final_score > self.reject_threshold {
            Decision::Reject
        } else if final_score > self.review_threshold {
            Decision::ManualReview
        } else {
            Decision::Accept
        }
    }

    /// Blends rule and model scores, rounded to one decimal place
    pub fn blend(&self, rule_score: i64, ai_score: Decimal) -> Decimal {
        let blended = self.rule_weight * Decimal::from(rule_score) + self.model_weight * ai_score;
        round_half_even(blended, 1).clamp(Decimal::ZERO, MAX_SCORE)
    }
}

/// Combines rule outcomes with the risk model into final decisions
pub struct DecisionBlender {
    policy: BlendPolicy,
    clock: Arc<dyn Clock>,
}

impl DecisionBlender {
    pub fn new(policy: BlendPolicy) -> Self {
        Self {
            policy,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used to timestamp decisions
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> &BlendPolicy {
        &self.policy
    }

    /// Produces the final decision for an application
    ///
    /// The estimator is only touched on the proceed path.
    ///
    /// # Errors
    ///
    /// Configuration errors from the estimator handle, and
    /// `ProbabilityOutOfRange` if the estimator returns anything other than a
    /// probability
    pub fn decide(
        &self,
        application: &Application,
        outcome: RuleOutcome,
        estimator: &EstimatorHandle,
    ) -> Result<DecisionRecord, UnderwritingError> {
        let application_id = application.id().clone();

        let (rule_score, mut reasons) = match outcome {
            RuleOutcome::Reject { reasons } => {
                tracing::info!(
                    application_id = %application_id,
                    knockouts = reasons.len(),
                    "Application rejected by knockout rules"
                );
                return Ok(DecisionRecord::new(
                    application_id,
                    Decision::Reject,
                    RiskSource::RuleEngine,
                    Decimal::from(KNOCKOUT_SCORE),
                    None,
                    reasons,
                    self.clock.now(),
                ));
            }
            RuleOutcome::Refer { rule_score, reasons } => {
                tracing::info!(
                    application_id = %application_id,
                    rule_score,
                    "Application referred for manual review"
                );
                let score = Decimal::from(rule_score).clamp(Decimal::ZERO, MAX_SCORE);
                return Ok(DecisionRecord::new(
                    application_id,
                    Decision::ManualReview,
                    RiskSource::RuleEngine,
                    score,
                    None,
                    reasons,
                    self.clock.now(),
                ));
            }
            RuleOutcome::Proceed { rule_score, reasons } => (rule_score, reasons),
        };

        let features = project(application);
        let probability = estimator.get()?.estimate(&features)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(UnderwritingError::ProbabilityOutOfRange(probability));
        }

        let ai_score = round_half_even(
            decimal_from_f64(probability)
                .map_err(|_| UnderwritingError::ProbabilityOutOfRange(probability))?
                * MAX_SCORE,
            2,
        );
        let blended_rule_score = if self.policy.clamp_rule_score {
            rule_score.min(KNOCKOUT_SCORE)
        } else {
            rule_score
        };

        let final_score = self.policy.blend(blended_rule_score, ai_score);
        let status = self.policy.classify(final_score);

        reasons.push(match status {
            Decision::Reject => format!("AI High Risk (Prob: {}%)", float_label(ai_score)),
            Decision::ManualReview => {
                format!("AI Moderate Risk (Prob: {}%)", float_label(ai_score))
            }
            Decision::Accept => format!("AI Low Risk (Prob: {}%)", float_label(ai_score)),
        });

        tracing::info!(
            application_id = %application_id,
            rule_score = blended_rule_score,
            ai_score = %ai_score,
            final_score = %final_score,
            decision = %status,
            "Hybrid decision made"
        );

        Ok(DecisionRecord::new(
            application_id,
            status,
            RiskSource::Hybrid,
            final_score,
            Some(ScoreBreakdown {
                rule: blended_rule_score,
                ai: ai_score,
            }),
            reasons,
            self.clock.now(),
        ))
    }
}

/// Shortest form with at least one decimal place: `50.0`, `12.35`
impl Default for DecisionBlender {
    fn default() -> Self {
        Self::new(BlendPolicy::default())
    }
}

impl std::fmt::Debug for DecisionBlender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionBlender")
            .field("policy", &self.policy)
            .finish()
    }
}
