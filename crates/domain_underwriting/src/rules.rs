//! Layered underwriting rules
//!
//! Rules are evaluated in three layers:
//!
//! ```text
//! Layer 1  Knockout   -> REJECT (score 100), every knockout reason collected
//! Layer 3  Referral   -> REFER, routed to manual review without the model
//! Layer 2  Modifiers  -> PROCEED with base risk + triggered loadings
//! ```
//!
//! Every rule is a small value implementing [`UnderwritingRule`]. The
//! [`RuleEvaluator`] folds its ordered rule list exactly once per application,
//! so policy changes add or remove rules without touching the evaluator.
//! Reasons keep rule declaration order within each layer.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::float_label;

use crate::application::Application;

/// Score reported for a knockout rejection
pub const KNOCKOUT_SCORE: i64 = 100;

/// Effect of a single triggered rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleEffect {
    /// Hard stop; one reason per disqualifying factor
    Knockout(Vec<String>),
    /// Route to manual review
    Refer(Vec<String>),
    /// Add points to the rule-based risk score
    Load { points: i64, reason: String },
}

/// A pure underwriting rule
pub trait UnderwritingRule: Send + Sync {
    /// Stable rule name used in logs
    fn name(&self) -> &'static str;

    /// Returns the rule's effect, or `None` when it does not trigger
    fn apply(&self, application: &Application) -> Option<RuleEffect>;
}

/// Coarse status of a [`RuleOutcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Reject,
    Refer,
    Proceed,
}

/// Result of evaluating all rules against one application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// At least one knockout fired
    Reject { reasons: Vec<String> },
    /// No knockout, but a referral rule fired
    Refer { rule_score: i64, reasons: Vec<String> },
    /// Passed the hard rules; ready for the risk model
    Proceed { rule_score: i64, reasons: Vec<String> },
}

impl RuleOutcome {
    pub fn status(&self) -> RuleStatus {
        match self {
            RuleOutcome::Reject { .. } => RuleStatus::Reject,
            RuleOutcome::Refer { .. } => RuleStatus::Refer,
            RuleOutcome::Proceed { .. } => RuleStatus::Proceed,
        }
    }

    /// Rule-based score; fixed at 100 for knockouts
    pub fn score(&self) -> i64 {
        match self {
            RuleOutcome::Reject { .. } => KNOCKOUT_SCORE,
            RuleOutcome::Refer { rule_score, .. } | RuleOutcome::Proceed { rule_score, .. } => {
                *rule_score
            }
        }
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            RuleOutcome::Reject { reasons }
            | RuleOutcome::Refer { reasons, .. }
            | RuleOutcome::Proceed { reasons, .. } => reasons,
        }
    }
}

/// Tunable parameters of the rule layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulePolicy {
    pub min_age: i64,
    pub max_age: i64,
    pub max_bmi: Decimal,
    pub uninsurable_conditions: Vec<String>,
    pub base_risk: i64,
    pub smoker_loading: i64,
    pub debt_to_income_limit: Decimal,
    pub debt_to_income_loading: i64,
    pub low_credit_threshold: u16,
    pub low_credit_loading: i64,
    /// Conditions that send an application to manual review
    pub referral_conditions: Vec<String>,
    /// Coverage-to-income multiple above which an application is referred
    pub max_auto_coverage_multiple: Option<Decimal>,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 75,
            max_bmi: dec!(40),
            uninsurable_conditions: vec![
                "terminal illness".to_string(),
                "severe heart failure".to_string(),
            ],
            base_risk: 20,
            smoker_loading: 30,
            debt_to_income_limit: dec!(0.60),
            debt_to_income_loading: 15,
            low_credit_threshold: 600,
            low_credit_loading: 20,
            referral_conditions: Vec::new(),
            max_auto_coverage_multiple: None,
        }
    }
}

fn normalize_condition(condition: &str) -> String {
    condition.trim().to_lowercase()
}

fn normalize_all(conditions: &[String]) -> Vec<String> {
    conditions.iter().map(|c| normalize_condition(c)).collect()
}

// ============================================================================
// Layer 1: knockout rules
// ============================================================================

/// Rejects applicants outside the insurable age band (inclusive)
#[derive(Debug, Clone)]
pub struct AgeKnockout {
    pub min_age: i64,
    pub max_age: i64,
}

impl UnderwritingRule for AgeKnockout {
    fn name(&self) -> &'static str {
        "age_limits"
    }

    fn apply(&self, application: &Application) -> Option<RuleEffect> {
        let age = application.age();
        (age < self.min_age || age > self.max_age).then(|| {
            RuleEffect::Knockout(vec![format!(
                "Applicant age {} is outside acceptable range ({}-{}).",
                age, self.min_age, self.max_age
            )])
        })
    }
}

/// Rejects applicants above the BMI acceptance limit
#[derive(Debug, Clone)]
pub struct BmiKnockout {
    pub max_bmi: Decimal,
}

impl UnderwritingRule for BmiKnockout {
    fn name(&self) -> &'static str {
        "bmi_extreme"
    }

    fn apply(&self, application: &Application) -> Option<RuleEffect> {
        let bmi = application.bmi();
        (bmi > self.max_bmi).then(|| {
            RuleEffect::Knockout(vec![format!(
                "BMI {} exceeds automatic acceptance limit.",
                float_label(bmi)
            )])
        })
    }
}

/// Rejects applicants disclosing an uninsurable condition
///
/// Matching ignores case and surrounding whitespace. One reason is produced
/// per matching disclosure, in disclosure order.
#[derive(Debug, Clone)]
pub struct UninsurableConditionKnockout {
    conditions: Vec<String>,
}

impl UninsurableConditionKnockout {
    pub fn new(conditions: &[String]) -> Self {
        Self {
            conditions: normalize_all(conditions),
        }
    }
}

impl UnderwritingRule for UninsurableConditionKnockout {
    fn name(&self) -> &'static str {
        "uninsurable_condition"
    }

    fn apply(&self, application: &Application) -> Option<RuleEffect> {
        let reasons: Vec<String> = application
            .medical_conditions()
            .iter()
            .filter(|c| self.conditions.contains(&normalize_condition(c)))
            .map(|c| format!("Uninsurable medical condition found: {}", c))
            .collect();

        (!reasons.is_empty()).then_some(RuleEffect::Knockout(reasons))
    }
}

// ============================================================================
// Layer 3: referral rules
// ============================================================================

/// Refers applicants disclosing a condition that needs an underwriter
#[derive(Debug, Clone)]
pub struct ConditionReferral {
    conditions: Vec<String>,
}

impl ConditionReferral {
    pub fn new(conditions: &[String]) -> Self {
        Self {
            conditions: normalize_all(conditions),
        }
    }
}

impl UnderwritingRule for ConditionReferral {
    fn name(&self) -> &'static str {
        "condition_referral"
    }

    fn apply(&self, application: &Application) -> Option<RuleEffect> {
        let reasons: Vec<String> = application
            .medical_conditions()
            .iter()
            .filter(|c| self.conditions.contains(&normalize_condition(c)))
            .map(|c| format!("Medical condition requires manual review: {}", c))
            .collect();

        (!reasons.is_empty()).then_some(RuleEffect::Refer(reasons))
    }
}

/// Refers applications whose coverage is a large multiple of income
#[derive(Debug, Clone)]
pub struct CoverageMultipleReferral {
    pub max_multiple: Decimal,
}

impl UnderwritingRule for CoverageMultipleReferral {
    fn name(&self) -> &'static str {
        "financial_justification"
    }

    fn apply(&self, application: &Application) -> Option<RuleEffect> {
        let multiple = application.coverage_income_multiple();
        (multiple > self.max_multiple).then(|| {
            RuleEffect::Refer(vec![format!(
                "Requested coverage ({}x income) exceeds automatic approval multiple.",
                float_label(multiple)
            )])
        })
    }
}

// ============================================================================
// Layer 2: risk modifiers
// ============================================================================

/// Loads smokers
#[derive(Debug, Clone)]
pub struct SmokerLoading {
    pub points: i64,
}

impl UnderwritingRule for SmokerLoading {
    fn name(&self) -> &'static str {
        "smoker_status"
    }

    fn apply(&self, application: &Application) -> Option<RuleEffect> {
        application.is_smoker().then(|| RuleEffect::Load {
            points: self.points,
            reason: format!("Applicant is a smoker (+{} risk).", self.points),
        })
    }
}

/// Loads applicants whose debt-to-income ratio exceeds the limit
#[derive(Debug, Clone)]
pub struct DebtToIncomeLoading {
    pub limit: Decimal,
    pub points: i64,
}

impl UnderwritingRule for DebtToIncomeLoading {
    fn name(&self) -> &'static str {
        "debt_to_income"
    }

    fn apply(&self, application: &Application) -> Option<RuleEffect> {
        let ratio = application.debt_to_income_ratio();
        (ratio > self.limit).then(|| RuleEffect::Load {
            points: self.points,
            reason: format!(
                "High debt-to-income ratio: {} (+{} risk).",
                float_label(ratio),
                self.points
            ),
        })
    }
}

/// Loads applicants with a reported credit score below the threshold
///
/// An absent credit score never triggers this rule.
#[derive(Debug, Clone)]
pub struct LowCreditLoading {
    pub threshold: u16,
    pub points: i64,
}

impl UnderwritingRule for LowCreditLoading {
    fn name(&self) -> &'static str {
        "low_credit_score"
    }

    fn apply(&self, application: &Application) -> Option<RuleEffect> {
        let score = application.credit_score()?;
        (score < self.threshold).then(|| RuleEffect::Load {
            points: self.points,
            reason: format!("Low credit score (+{} risk).", self.points),
        })
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Folds an ordered list of rules into a [`RuleOutcome`]
pub struct RuleEvaluator {
    base_risk: i64,
    rules: Vec<Box<dyn UnderwritingRule>>,
}

impl RuleEvaluator {
    /// Creates an evaluator with no rules
    pub fn new(base_risk: i64) -> Self {
        Self {
            base_risk,
            rules: Vec::new(),
        }
    }

    /// Creates the standard rule set for a policy
    ///
    /// Referral rules are only registered when the policy configures them.
    pub fn from_policy(policy: &RulePolicy) -> Self {
        let mut evaluator = Self::new(policy.base_risk)
            .with_rule(AgeKnockout {
                min_age: policy.min_age,
                max_age: policy.max_age,
            })
            .with_rule(BmiKnockout {
                max_bmi: policy.max_bmi,
            })
            .with_rule(UninsurableConditionKnockout::new(&policy.uninsurable_conditions));

        if !policy.referral_conditions.is_empty() {
            evaluator = evaluator.with_rule(ConditionReferral::new(&policy.referral_conditions));
        }
        if let Some(max_multiple) = policy.max_auto_coverage_multiple {
            evaluator = evaluator.with_rule(CoverageMultipleReferral { max_multiple });
        }

        evaluator
            .with_rule(SmokerLoading {
                points: policy.smoker_loading,
            })
            .with_rule(DebtToIncomeLoading {
                limit: policy.debt_to_income_limit,
                points: policy.debt_to_income_loading,
            })
            .with_rule(LowCreditLoading {
                threshold: policy.low_credit_threshold,
                points: policy.low_credit_loading,
            })
    }

    /// Appends a rule; it runs after all rules registered before it
    pub fn with_rule(mut self, rule: impl UnderwritingRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn base_risk(&self) -> i64 {
        self.base_risk
    }

    /// Names of the registered rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Evaluates every rule against the application
    ///
    /// Knockouts win over referrals, referrals win over a plain proceed.
    pub fn evaluate(&self, application: &Application) -> RuleOutcome {
        let mut knockouts = Vec::new();
        let mut referrals = Vec::new();
        let mut loadings = Vec::new();
        let mut rule_score = self.base_risk;

        for rule in &self.rules {
            let Some(effect) = rule.apply(application) else {
                continue;
            };
            tracing::debug!(
                application_id = %application.id(),
                rule = rule.name(),
                effect = ?effect,
                "Rule triggered"
            );
            match effect {
                RuleEffect::Knockout(reasons) => knockouts.extend(reasons),
                RuleEffect::Refer(reasons) => referrals.extend(reasons),
                RuleEffect::Load { points, reason } => {
                    rule_score += points;
                    loadings.push(reason);
                }
            }
        }

        if !knockouts.is_empty() {
            return RuleOutcome::Reject { reasons: knockouts };
        }

        if !referrals.is_empty() {
            referrals.extend(loadings);
            return RuleOutcome::Refer {
                rule_score,
                reasons: referrals,
            };
        }

        RuleOutcome::Proceed {
            rule_score,
            reasons: loadings,
        }
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::from_policy(&RulePolicy::default())
    }
}

impl std::fmt::Debug for RuleEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEvaluator")
            .field("base_risk", &self.base_risk)
            .field("rules", &self.rule_names())
            .finish()
    }
}
