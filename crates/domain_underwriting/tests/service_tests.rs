//! End-to-end tests for the underwriting service

use chrono::NaiveDate;
use domain_underwriting::features::feature_names;
use domain_underwriting::{
    Application, ApplicationInput, Decision, DecisionBlender, EstimatorHandle, FeatureVector,
    ProbabilityEstimator, RiskSource, RuleEvaluator, UnderwritingError, UnderwritingService,
};
use std::sync::Arc;

/// Probability grows with debt so batch results differ per applicant
struct DebtSensitive;

impl ProbabilityEstimator for DebtSensitive {
    fn feature_names(&self) -> Vec<String> {
        feature_names()
    }

    fn estimate(&self, features: &FeatureVector) -> Result<f64, UnderwritingError> {
        Ok((features.total_debt / features.annual_income).clamp(0.0, 1.0))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn service() -> UnderwritingService {
    UnderwritingService::new(
        RuleEvaluator::default(),
        DecisionBlender::default(),
        Arc::new(EstimatorHandle::ready(Arc::new(DebtSensitive)).unwrap()),
    )
}

fn input(app_id: &str, dob: &str, debt: f64) -> serde_json::Value {
    serde_json::json!({
        "app_id": app_id,
        "applicant_name": "Applicant_1042",
        "dob": dob,
        "gender": "Male",
        "weight_kg": 81.0,
        "height_cm": 180.0,
        "submission_date": "2024-06-01",
        "annual_income": 60000.0,
        "total_debt": debt,
        "credit_score": 720,
        "is_smoker": false,
        "medical_conditions": [],
        "policy_type": "Term",
        "coverage_amount": 600000.0
    })
}

fn application(value: serde_json::Value) -> Application {
    serde_json::from_value::<ApplicationInput>(value)
        .unwrap()
        .into_application(today())
        .unwrap()
}

#[test]
fn test_payload_to_decision() {
    let app = application(input("a1b2c3d4", "1994-06-10", 6000.0));

    let decision = service().evaluate_application(&app).unwrap();

    // ai = 10.0, 0.4 * 20 + 0.6 * 10 = 14
    assert_eq!(decision.application_id().as_str(), "a1b2c3d4");
    assert_eq!(decision.status(), Decision::Accept);
    assert_eq!(decision.risk_source(), RiskSource::Hybrid);
    assert_eq!(decision.final_score(), rust_decimal_macros::dec!(14.0));
}

#[test]
fn test_decision_record_wire_format() {
    let app = application(input("wire-01", "1994-06-10", 6000.0));
    let decision = service().evaluate_application(&app).unwrap();

    let json = serde_json::to_value(&decision).unwrap();

    assert_eq!(json["application_id"], "wire-01");
    assert_eq!(json["status"], "ACCEPT");
    assert_eq!(json["risk_source"], "Hybrid");
    assert_eq!(json["final_score"], 14.0);
    assert_eq!(json["breakdown"]["rule"], 20);
    assert_eq!(json["breakdown"]["ai"], 10.0);
    assert!(json["timestamp"].is_string());
}

#[test]
fn test_rejection_wire_format_has_no_breakdown() {
    let app = application(input("wire-02", "2010-01-01", 0.0));
    let decision = service().evaluate_application(&app).unwrap();

    let json = serde_json::to_value(&decision).unwrap();

    assert_eq!(json["status"], "REJECT");
    assert_eq!(json["risk_source"], "Rule Engine");
    assert_eq!(json["final_score"], 100.0);
    assert!(json.get("breakdown").is_none());
}

#[test]
fn test_invalid_payload_never_reaches_engine() {
    let mut value = input("bad-01", "1990-01-01", 0.0);
    value["weight_kg"] = serde_json::json!(310.0);

    let err = serde_json::from_value::<ApplicationInput>(value)
        .unwrap()
        .into_application(today())
        .unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("weight_kg"));
}

#[test]
fn test_batch_preserves_input_order() {
    let applications: Vec<Application> = (0..64)
        .map(|i| {
            let dob = if i % 5 == 0 { "2012-02-02" } else { "1985-02-02" };
            application(input(&format!("batch-{i:03}"), dob, f64::from(i) * 900.0))
        })
        .collect();

    let results = service().evaluate_batch(&applications);

    assert_eq!(results.len(), applications.len());
    for (app, result) in applications.iter().zip(&results) {
        let decision = result.as_ref().unwrap();
        assert_eq!(decision.application_id(), app.id());
    }
    assert!(results
        .iter()
        .step_by(5)
        .all(|r| r.as_ref().unwrap().status() == Decision::Reject));
}

#[test]
fn test_batch_matches_sequential_evaluation() {
    let service = service();
    let applications: Vec<Application> = (0..32)
        .map(|i| application(input(&format!("seq-{i}"), "1980-07-07", f64::from(i) * 1500.0)))
        .collect();

    let parallel: Vec<_> = service
        .evaluate_batch(&applications)
        .into_iter()
        .map(|r| {
            let d = r.unwrap();
            (d.status(), d.final_score(), d.reasons().to_vec())
        })
        .collect();
    let sequential: Vec<_> = applications
        .iter()
        .map(|a| {
            let d = service.evaluate_application(a).unwrap();
            (d.status(), d.final_score(), d.reasons().to_vec())
        })
        .collect();

    assert_eq!(parallel, sequential);
}
