//! Feature projection for the risk model
//!
//! The estimator was fit on a fixed column layout. [`FEATURE_SCHEMA`] is that
//! layout; [`project`] is the only place an [`Application`] is turned into
//! model input. A missing credit score is projected as `0`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::{Application, Gender, PolicyType};
use crate::error::UnderwritingError;

/// How a feature is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

/// One column of the feature layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub kind: FeatureKind,
}

const fn numeric(name: &'static str) -> FeatureSpec {
    FeatureSpec {
        name,
        kind: FeatureKind::Numeric,
    }
}

const fn categorical(name: &'static str) -> FeatureSpec {
    FeatureSpec {
        name,
        kind: FeatureKind::Categorical,
    }
}

/// Feature layout, in the order the estimator was fit on
pub const FEATURE_SCHEMA: [FeatureSpec; 10] = [
    numeric("age"),
    numeric("weight_kg"),
    numeric("height_cm"),
    numeric("annual_income"),
    numeric("total_debt"),
    numeric("credit_score"),
    categorical("gender"),
    categorical("policy_type"),
    numeric("coverage_amount"),
    numeric("medical_count"),
];

/// Names of [`FEATURE_SCHEMA`], in order
pub fn feature_names() -> Vec<String> {
    FEATURE_SCHEMA.iter().map(|f| f.name.to_string()).collect()
}

/// Looks up the kind of a named feature
pub fn feature_kind(name: &str) -> Option<FeatureKind> {
    FEATURE_SCHEMA.iter().find(|f| f.name == name).map(|f| f.kind)
}

/// Checks that an estimator's declared layout matches the projector exactly
///
/// # Errors
///
/// Returns `FeatureShapeMismatch` on any difference in names or order
pub fn verify_feature_schema(expected: &[String]) -> Result<(), UnderwritingError> {
    let actual = feature_names();
    if expected != actual.as_slice() {
        return Err(UnderwritingError::FeatureShapeMismatch {
            expected: expected.to_vec(),
            actual,
        });
    }
    Ok(())
}

/// Model input for one application
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub age: i64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub annual_income: f64,
    pub total_debt: f64,
    pub credit_score: u16,
    pub gender: Gender,
    pub policy_type: PolicyType,
    pub coverage_amount: f64,
    pub medical_count: usize,
}

impl FeatureVector {
    /// Value of a numeric feature by schema name
    pub fn numeric(&self, name: &str) -> Option<f64> {
        match name {
            "age" => Some(self.age as f64),
            "weight_kg" => Some(self.weight_kg),
            "height_cm" => Some(self.height_cm),
            "annual_income" => Some(self.annual_income),
            "total_debt" => Some(self.total_debt),
            "credit_score" => Some(f64::from(self.credit_score)),
            "coverage_amount" => Some(self.coverage_amount),
            "medical_count" => Some(self.medical_count as f64),
            _ => None,
        }
    }

    /// Value of a categorical feature by schema name
    pub fn categorical(&self, name: &str) -> Option<&'static str> {
        match name {
            "gender" => Some(self.gender.as_str()),
            "policy_type" => Some(self.policy_type.as_str()),
            _ => None,
        }
    }
}

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Projects an application onto the model's feature layout
pub fn project(application: &Application) -> FeatureVector {
    FeatureVector {
        age: application.age(),
        weight_kg: as_f64(application.weight_kg()),
        height_cm: as_f64(application.height_cm()),
        annual_income: as_f64(application.annual_income()),
        total_debt: as_f64(application.total_debt()),
        credit_score: application.credit_score().unwrap_or(0),
        gender: application.gender(),
        policy_type: application.policy_type(),
        coverage_amount: as_f64(application.coverage_amount()),
        medical_count: application.medical_conditions().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationBuilder;
    use chrono::NaiveDate;
    use core_kernel::ApplicationId;
    use rust_decimal_macros::dec;

    fn application(credit_score: Option<u16>) -> Application {
        let submitted = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        ApplicationBuilder::new()
            .id(ApplicationId::new("feat-001").unwrap())
            .date_of_birth(submitted - chrono::Duration::days(42 * 365 + 10))
            .submission_date(submitted)
            .gender(Gender::Other)
            .weight_kg(dec!(72.5))
            .height_cm(dec!(170))
            .annual_income(dec!(88000))
            .total_debt(dec!(12000))
            .credit_score(credit_score)
            .smoker(true)
            .medical_conditions(["asthma", "hypertension"])
            .policy_type(PolicyType::Universal)
            .coverage_amount(dec!(400000))
            .build()
            .unwrap()
    }

    #[test]
    fn test_projection_fields() {
        let features = project(&application(Some(640)));
        assert_eq!(features.age, 42);
        assert_eq!(features.weight_kg, 72.5);
        assert_eq!(features.credit_score, 640);
        assert_eq!(features.medical_count, 2);
        assert_eq!(features.categorical("gender"), Some("Other"));
        assert_eq!(features.categorical("policy_type"), Some("Universal"));
    }

    #[test]
    fn test_missing_credit_score_projects_to_zero() {
        let features = project(&application(None));
        assert_eq!(features.numeric("credit_score"), Some(0.0));
    }

    #[test]
    fn test_every_schema_column_resolves() {
        let features = project(&application(Some(700)));
        for spec in FEATURE_SCHEMA {
            let resolved = match spec.kind {
                FeatureKind::Numeric => features.numeric(spec.name).is_some(),
                FeatureKind::Categorical => features.categorical(spec.name).is_some(),
            };
            assert!(resolved, "feature {} did not resolve", spec.name);
        }
    }

    #[test]
    fn test_schema_verification() {
        assert!(verify_feature_schema(&feature_names()).is_ok());

        let mut reordered = feature_names();
        reordered.swap(0, 1);
        assert!(matches!(
            verify_feature_schema(&reordered),
            Err(UnderwritingError::FeatureShapeMismatch { .. })
        ));
    }
}
