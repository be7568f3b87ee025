//! Pre-built Test Fixtures
//!
//! Provides ready-to-use applicants, clocks and model artifacts. These
//! fixtures are consistent and predictable for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::FixedClock;
use domain_underwriting::{Application, LogisticRiskModel};
use rust_decimal_macros::dec;
use std::path::PathBuf;
use std::sync::Arc;

use crate::builders::TestApplicationBuilder;

/// The risk model artifact shipped with the repository
pub const SHIPPED_MODEL_JSON: &str = include_str!("../../../models/risk_model.json");

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard submission date
    pub fn submission_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    /// Standard decision timestamp
    pub fn decision_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    /// Clock frozen at [`TemporalFixtures::decision_time`]
    pub fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(Self::decision_time()))
    }
}

/// Fixture for applicants
pub struct ApplicantFixtures;

impl ApplicantFixtures {
    /// Triggers no rule at all; rule score 20
    pub fn clean() -> Application {
        TestApplicationBuilder::new().with_id("clean-001").build()
    }

    /// Smoker, credit 550, debt/income 0.7, age 30, BMI 25; rule score 85
    pub fn high_risk() -> Application {
        Self::high_risk_builder().build()
    }

    pub fn high_risk_builder() -> TestApplicationBuilder {
        TestApplicationBuilder::new()
            .with_id("high-risk-001")
            .smoker()
            .with_credit_score(Some(550))
            .with_debt_to_income(dec!(0.7))
    }

    /// Aged 17 at submission
    pub fn minor() -> Application {
        TestApplicationBuilder::new()
            .with_id("minor-001")
            .with_age(17)
            .build()
    }

    /// Discloses terminal illness
    pub fn terminal_illness() -> Application {
        TestApplicationBuilder::new()
            .with_id("terminal-001")
            .with_condition("Terminal Illness")
            .build()
    }
}

/// Fixture for model artifacts
pub struct ModelFixtures;

impl ModelFixtures {
    /// Path of the shipped artifact in the source tree
    pub fn shipped_artifact_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models/risk_model.json")
    }

    /// The shipped artifact, parsed
    pub fn shipped_model() -> LogisticRiskModel {
        LogisticRiskModel::from_json_str(SHIPPED_MODEL_JSON).expect("shipped model must parse")
    }
}
