//! Logistic risk model artifact
//!
//! The training pipeline exports a standardising logistic model as JSON:
//!
//! ```json
//! {
//!   "version": "2024.06-lr",
//!   "features": ["age", "weight_kg", ..., "medical_count"],
//!   "intercept": -1.4,
//!   "numeric": { "age": { "mean": 40.0, "scale": 12.0, "weight": 0.35 } },
//!   "categorical": { "gender": { "Male": 0.05, "Female": -0.05 } }
//! }
//! ```
//!
//! `p = sigmoid(intercept + Σ weight·(x − mean)/scale + Σ category weight)`.
//! Categories absent from the artifact contribute nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::UnderwritingError;
use crate::estimator::ProbabilityEstimator;
use crate::features::{feature_kind, FeatureKind, FeatureVector};

/// Standardisation and weight of one numeric feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericCoefficient {
    pub mean: f64,
    pub scale: f64,
    pub weight: f64,
}

/// A fitted logistic model over the projected features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRiskModel {
    pub version: String,
    pub features: Vec<String>,
    pub intercept: f64,
    #[serde(default)]
    pub numeric: BTreeMap<String, NumericCoefficient>,
    #[serde(default)]
    pub categorical: BTreeMap<String, BTreeMap<String, f64>>,
}

impl LogisticRiskModel {
    /// Parses an artifact from JSON
    ///
    /// # Errors
    ///
    /// Returns `InvalidArtifact` if the JSON is malformed or the coefficients
    /// do not cover the declared features
    pub fn from_json_str(json: &str) -> Result<Self, UnderwritingError> {
        let model: Self = serde_json::from_str(json)
            .map_err(|e| UnderwritingError::invalid_artifact(e.to_string()))?;
        model.check_integrity()?;
        Ok(model)
    }

    /// Loads an artifact from a file
    ///
    /// # Errors
    ///
    /// Returns `ArtifactMissing` if the file does not exist, otherwise the
    /// errors of [`LogisticRiskModel::from_json_str`]
    pub fn from_file(path: &Path) -> Result<Self, UnderwritingError> {
        if !path.exists() {
            return Err(UnderwritingError::ArtifactMissing(path.display().to_string()));
        }
        tracing::info!(path = %path.display(), "Loading risk model artifact");

        let content = std::fs::read_to_string(path).map_err(|e| {
            UnderwritingError::invalid_artifact(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    fn check_integrity(&self) -> Result<(), UnderwritingError> {
        for name in &self.features {
            let in_numeric = self.numeric.contains_key(name);
            let in_categorical = self.categorical.contains_key(name);
            if in_numeric == in_categorical {
                return Err(UnderwritingError::invalid_artifact(format!(
                    "feature '{name}' must have exactly one numeric or categorical entry"
                )));
            }
            if let Some(kind) = feature_kind(name) {
                let declared = if in_numeric {
                    FeatureKind::Numeric
                } else {
                    FeatureKind::Categorical
                };
                if kind != declared {
                    return Err(UnderwritingError::invalid_artifact(format!(
                        "feature '{name}' is {kind:?} but the artifact encodes it as {declared:?}"
                    )));
                }
            }
        }

        let declared = |name: &String| self.features.contains(name);
        if let Some(extra) = self
            .numeric
            .keys()
            .chain(self.categorical.keys())
            .find(|name| !declared(name))
        {
            return Err(UnderwritingError::invalid_artifact(format!(
                "coefficients given for undeclared feature '{extra}'"
            )));
        }

        for (name, coefficient) in &self.numeric {
            if !(coefficient.scale.is_finite() && coefficient.scale > 0.0) {
                return Err(UnderwritingError::invalid_artifact(format!(
                    "feature '{name}' has non-positive scale {}",
                    coefficient.scale
                )));
            }
        }

        Ok(())
    }

    fn linear_term(&self, features: &FeatureVector) -> Result<f64, UnderwritingError> {
        let mut z = self.intercept;

        for name in &self.features {
            if let Some(coefficient) = self.numeric.get(name) {
                let value = features.numeric(name).ok_or_else(|| self.shape_error())?;
                z += coefficient.weight * (value - coefficient.mean) / coefficient.scale;
            } else if let Some(levels) = self.categorical.get(name) {
                let level = features.categorical(name).ok_or_else(|| self.shape_error())?;
                z += levels.get(level).copied().unwrap_or(0.0);
            }
        }

        Ok(z)
    }

    fn shape_error(&self) -> UnderwritingError {
        UnderwritingError::FeatureShapeMismatch {
            expected: self.features.clone(),
            actual: crate::features::feature_names(),
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl ProbabilityEstimator for LogisticRiskModel {
    fn feature_names(&self) -> Vec<String> {
        self.features.clone()
    }

    fn estimate(&self, features: &FeatureVector) -> Result<f64, UnderwritingError> {
        Ok(sigmoid(self.linear_term(features)?))
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> serde_json::Value {
        serde_json::json!({
            "version": "test-1",
            "features": ["age", "weight_kg", "height_cm", "annual_income", "total_debt",
                         "credit_score", "gender", "policy_type", "coverage_amount", "medical_count"],
            "intercept": 0.0,
            "numeric": {
                "age": { "mean": 40.0, "scale": 10.0, "weight": 1.0 },
                "weight_kg": { "mean": 0.0, "scale": 1.0, "weight": 0.0 },
                "height_cm": { "mean": 0.0, "scale": 1.0, "weight": 0.0 },
                "annual_income": { "mean": 0.0, "scale": 1.0, "weight": 0.0 },
                "total_debt": { "mean": 0.0, "scale": 1.0, "weight": 0.0 },
                "credit_score": { "mean": 0.0, "scale": 1.0, "weight": 0.0 },
                "coverage_amount": { "mean": 0.0, "scale": 1.0, "weight": 0.0 },
                "medical_count": { "mean": 0.0, "scale": 1.0, "weight": 0.0 }
            },
            "categorical": {
                "gender": { "Male": 0.5 },
                "policy_type": {}
            }
        })
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }

    #[test]
    fn test_parses_valid_artifact() {
        let model = LogisticRiskModel::from_json_str(&artifact().to_string()).unwrap();
        assert_eq!(model.version(), "test-1");
        assert_eq!(model.feature_names().len(), 10);
    }

    #[test]
    fn test_rejects_uncovered_feature() {
        let mut value = artifact();
        value["numeric"].as_object_mut().unwrap().remove("age");
        let err = LogisticRiskModel::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, UnderwritingError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_zero_scale() {
        let mut value = artifact();
        value["numeric"]["age"]["scale"] = serde_json::json!(0.0);
        assert!(LogisticRiskModel::from_json_str(&value.to_string()).is_err());
    }

    #[test]
    fn test_rejects_kind_confusion() {
        let mut value = artifact();
        value["numeric"].as_object_mut().unwrap().remove("age");
        value["categorical"]["age"] = serde_json::json!({ "old": 1.0 });
        let err = LogisticRiskModel::from_json_str(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_malformed_json() {
        let err = LogisticRiskModel::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, UnderwritingError::InvalidArtifact(_)));
    }
}
