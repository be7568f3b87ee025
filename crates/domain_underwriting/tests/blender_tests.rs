//! Tests for hybrid decision blending
//!
//! Uses stub estimators so every score in this file can be worked out by hand.

use chrono::{NaiveDate, TimeZone, Utc};
use core_kernel::{ApplicationId, FixedClock};
use domain_underwriting::features::feature_names;
use domain_underwriting::{
    ApplicationBuilder, BlendPolicy, Decision, DecisionBlender, EstimatorHandle, FeatureVector,
    Gender, PolicyType, ProbabilityEstimator, RiskSource, RuleEvaluator, RuleOutcome, RulePolicy,
    ScoreBreakdown, UnderwritingError, UnderwritingService,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns a fixed probability and counts how often it is asked
struct CountingEstimator {
    probability: f64,
    calls: AtomicUsize,
}

impl CountingEstimator {
    fn new(probability: f64) -> Arc<Self> {
        Arc::new(Self {
            probability,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProbabilityEstimator for CountingEstimator {
    fn feature_names(&self) -> Vec<String> {
        feature_names()
    }

    fn estimate(&self, _features: &FeatureVector) -> Result<f64, UnderwritingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.probability)
    }
}

fn submitted() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn clean_builder() -> ApplicationBuilder {
    ApplicationBuilder::new()
        .id(ApplicationId::new("blend-001").unwrap())
        .date_of_birth(submitted() - chrono::Duration::days(30 * 365))
        .submission_date(submitted())
        .gender(Gender::Female)
        .weight_kg(dec!(81))
        .height_cm(dec!(180))
        .annual_income(dec!(60000))
        .total_debt(dec!(0))
        .credit_score(Some(720))
        .smoker(false)
        .policy_type(PolicyType::Term)
        .coverage_amount(dec!(600000))
}

/// Smoker, credit 550, debt/income 0.7, age 30, BMI 25
fn high_risk_builder() -> ApplicationBuilder {
    clean_builder()
        .smoker(true)
        .credit_score(Some(550))
        .total_debt(dec!(42000))
}

fn service_with(estimator: Arc<CountingEstimator>) -> UnderwritingService {
    UnderwritingService::new(
        RuleEvaluator::default(),
        DecisionBlender::default(),
        Arc::new(EstimatorHandle::ready(estimator).unwrap()),
    )
}

mod short_circuit {
    use super::*;

    #[test]
    fn test_knockout_never_consults_estimator() {
        let estimator = CountingEstimator::new(0.1);
        let service = service_with(estimator.clone());
        let minor = clean_builder()
            .date_of_birth(submitted() - chrono::Duration::days(17 * 365))
            .build()
            .unwrap();

        let decision = service.evaluate_application(&minor).unwrap();

        assert_eq!(decision.status(), Decision::Reject);
        assert_eq!(decision.final_score(), dec!(100));
        assert_eq!(decision.risk_source(), RiskSource::RuleEngine);
        assert!(decision.breakdown().is_none());
        assert_eq!(estimator.calls(), 0);
    }

    #[test]
    fn test_knockout_does_not_force_lazy_load() {
        let handle = EstimatorHandle::lazy(|| {
            Err(UnderwritingError::ArtifactMissing("never loaded".to_string()))
        });
        let service = UnderwritingService::new(
            RuleEvaluator::default(),
            DecisionBlender::default(),
            Arc::new(handle),
        );
        let terminal = clean_builder()
            .medical_condition("Terminal Illness")
            .build()
            .unwrap();

        let decision = service.evaluate_application(&terminal).unwrap();

        assert_eq!(decision.status(), Decision::Reject);
        assert!(!service.estimator().is_initialized());
    }

    #[test]
    fn test_referral_never_consults_estimator() {
        let estimator = CountingEstimator::new(0.9);
        let policy = RulePolicy {
            referral_conditions: vec!["diabetes".to_string()],
            ..RulePolicy::default()
        };
        let service = UnderwritingService::new(
            RuleEvaluator::from_policy(&policy),
            DecisionBlender::default(),
            Arc::new(EstimatorHandle::ready(estimator.clone()).unwrap()),
        );
        let app = clean_builder()
            .medical_condition("Diabetes")
            .smoker(true)
            .build()
            .unwrap();

        let decision = service.evaluate_application(&app).unwrap();

        assert_eq!(decision.status(), Decision::ManualReview);
        assert_eq!(decision.risk_source(), RiskSource::RuleEngine);
        assert_eq!(decision.final_score(), dec!(50));
        assert_eq!(
            decision.reasons(),
            [
                "Medical condition requires manual review: Diabetes".to_string(),
                "Applicant is a smoker (+30 risk).".to_string(),
            ]
        );
        assert_eq!(estimator.calls(), 0);
    }

    #[test]
    fn test_referral_score_is_capped_at_hundred() {
        let blender = DecisionBlender::default();
        let handle = EstimatorHandle::ready(CountingEstimator::new(0.5)).unwrap();
        let app = clean_builder().build().unwrap();

        let decision = blender
            .decide(
                &app,
                RuleOutcome::Refer {
                    rule_score: 135,
                    reasons: vec!["Needs a human".to_string()],
                },
                &handle,
            )
            .unwrap();

        assert_eq!(decision.final_score(), dec!(100));
    }
}

mod hybrid {
    use super::*;

    #[test]
    fn test_high_risk_scenario_goes_to_manual_review() {
        let estimator = CountingEstimator::new(0.5);
        let service = service_with(estimator.clone());
        let app = high_risk_builder().build().unwrap();

        let decision = service.evaluate_application(&app).unwrap();

        assert_eq!(decision.status(), Decision::ManualReview);
        assert_eq!(decision.risk_source(), RiskSource::Hybrid);
        assert_eq!(decision.final_score(), dec!(64.0));
        assert_eq!(
            decision.breakdown(),
            Some(&ScoreBreakdown {
                rule: 85,
                ai: dec!(50.0)
            })
        );
        assert_eq!(
            decision.reasons(),
            [
                "Applicant is a smoker (+30 risk).".to_string(),
                "High debt-to-income ratio: 0.7 (+15 risk).".to_string(),
                "Low credit score (+20 risk).".to_string(),
                "AI Moderate Risk (Prob: 50.0%)".to_string(),
            ]
        );
        assert_eq!(estimator.calls(), 1);
    }

    #[test]
    fn test_clean_applicant_with_risky_model_score() {
        let service = service_with(CountingEstimator::new(0.8));
        let app = clean_builder().build().unwrap();

        let decision = service.evaluate_application(&app).unwrap();

        assert_eq!(decision.final_score(), dec!(56.0));
        assert_eq!(decision.status(), Decision::ManualReview);
        assert_eq!(decision.reasons(), ["AI Moderate Risk (Prob: 80.0%)".to_string()]);
    }

    #[test]
    fn test_clean_applicant_with_low_model_score_is_accepted() {
        let service = service_with(CountingEstimator::new(0.1));
        let app = clean_builder().build().unwrap();

        let decision = service.evaluate_application(&app).unwrap();

        // 0.4 * 20 + 0.6 * 10 = 14
        assert_eq!(decision.final_score(), dec!(14.0));
        assert_eq!(decision.status(), Decision::Accept);
        assert_eq!(decision.reasons(), ["AI Low Risk (Prob: 10.0%)".to_string()]);
    }

    #[test]
    fn test_high_blend_is_rejected_with_high_risk_reason() {
        let service = service_with(CountingEstimator::new(0.95));
        let app = high_risk_builder().build().unwrap();

        let decision = service.evaluate_application(&app).unwrap();

        // 0.4 * 85 + 0.6 * 95 = 91
        assert_eq!(decision.final_score(), dec!(91.0));
        assert_eq!(decision.status(), Decision::Reject);
        assert_eq!(decision.risk_source(), RiskSource::Hybrid);
        assert_eq!(
            decision.reasons().last().map(String::as_str),
            Some("AI High Risk (Prob: 95.0%)")
        );
    }

    #[test]
    fn test_probability_above_one_is_an_error() {
        let service = service_with(CountingEstimator::new(1.2));
        let app = clean_builder().build().unwrap();

        let err = service.evaluate_application(&app).unwrap_err();

        assert!(matches!(err, UnderwritingError::ProbabilityOutOfRange(p) if p == 1.2));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_nan_probability_is_an_error() {
        let service = service_with(CountingEstimator::new(f64::NAN));
        let app = clean_builder().build().unwrap();

        assert!(matches!(
            service.evaluate_application(&app),
            Err(UnderwritingError::ProbabilityOutOfRange(_))
        ));
    }

    #[test]
    fn test_clamped_rule_score_is_reported_in_breakdown() {
        let blender = DecisionBlender::new(BlendPolicy {
            clamp_rule_score: true,
            ..BlendPolicy::default()
        });
        let handle = EstimatorHandle::ready(CountingEstimator::new(0.5)).unwrap();
        let app = clean_builder().build().unwrap();

        let decision = blender
            .decide(
                &app,
                RuleOutcome::Proceed {
                    rule_score: 140,
                    reasons: vec![],
                },
                &handle,
            )
            .unwrap();

        // 0.4 * 100 + 0.6 * 50 = 70
        assert_eq!(decision.final_score(), dec!(70.0));
        assert_eq!(decision.breakdown().map(|b| b.rule), Some(100));
    }

    #[test]
    fn test_unclamped_rule_score_is_bounded_after_blending() {
        let blender = DecisionBlender::new(BlendPolicy {
            rule_weight: dec!(1),
            model_weight: dec!(1),
            ..BlendPolicy::default()
        });
        let handle = EstimatorHandle::ready(CountingEstimator::new(0.9)).unwrap();
        let app = clean_builder().build().unwrap();

        let decision = blender
            .decide(
                &app,
                RuleOutcome::Proceed {
                    rule_score: 140,
                    reasons: vec![],
                },
                &handle,
            )
            .unwrap();

        assert_eq!(decision.final_score(), dec!(100));
        assert_eq!(decision.breakdown().map(|b| b.rule), Some(140));
        assert_eq!(decision.status(), Decision::Reject);
    }

    #[test]
    fn test_custom_thresholds() {
        let blender = DecisionBlender::new(BlendPolicy {
            reject_threshold: dec!(60),
            review_threshold: dec!(20),
            ..BlendPolicy::default()
        });
        let handle = EstimatorHandle::ready(CountingEstimator::new(0.8)).unwrap();
        let app = clean_builder().build().unwrap();

        let decision = blender
            .decide(
                &app,
                RuleOutcome::Proceed {
                    rule_score: 20,
                    reasons: vec![],
                },
                &handle,
            )
            .unwrap();

        assert_eq!(decision.status(), Decision::ManualReview);
    }
}

mod idempotence {
    use super::*;

    #[test]
    fn test_same_input_same_record_with_fixed_clock() {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        ));
        let service = service_with(CountingEstimator::new(0.5)).with_clock(clock);
        let app = high_risk_builder().build().unwrap();

        let first = service.evaluate_application(&app).unwrap();
        let second = service.evaluate_application(&app).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.timestamp(),
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
        );
        assert_eq!(first.application_id().as_str(), "blend-001");
    }
}

mod properties {
    use super::*;

    proptest! {
        #[test]
        fn prop_final_score_is_bounded(
            probability in 0.0f64..=1.0,
            rule_score in 0i64..400,
        ) {
            let blender = DecisionBlender::default();
            let handle = EstimatorHandle::ready(CountingEstimator::new(probability)).unwrap();
            let app = clean_builder().build().unwrap();

            let decision = blender
                .decide(&app, RuleOutcome::Proceed { rule_score, reasons: vec![] }, &handle)
                .unwrap();

            prop_assert!(decision.final_score() >= Decimal::ZERO);
            prop_assert!(decision.final_score() <= dec!(100));
        }

        #[test]
        fn prop_status_follows_thresholds(probability in 0.0f64..=1.0) {
            let service = service_with(CountingEstimator::new(probability));
            let app = clean_builder().build().unwrap();

            let decision = service.evaluate_application(&app).unwrap();
            let score = decision.final_score();
            let expected = if score > dec!(75) {
                Decision::Reject
            } else if score > dec!(40) {
                Decision::ManualReview
            } else {
                Decision::Accept
            };

            prop_assert_eq!(decision.status(), expected);
        }

        #[test]
        fn prop_higher_probability_never_lowers_score(
            low in 0.0f64..=1.0,
            delta in 0.0f64..=1.0,
        ) {
            let high = (low + delta).min(1.0);
            let app = high_risk_builder().build().unwrap();

            let low_score = service_with(CountingEstimator::new(low))
                .evaluate_application(&app)
                .unwrap()
                .final_score();
            let high_score = service_with(CountingEstimator::new(high))
                .evaluate_application(&app)
                .unwrap()
                .final_score();

            prop_assert!(high_score >= low_score);
        }
    }
}
