//! Underwriting policy configuration
//!
//! Sources are layered, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML/JSON/YAML file
//! 3. environment variables prefixed `UW_`, nested with `__`
//!    (e.g. `UW_BLEND__REJECT_THRESHOLD=80`, `UW_RULES__REFERRAL_CONDITIONS=diabetes,copd`)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::blender::BlendPolicy;
use crate::error::UnderwritingError;
use crate::rules::RulePolicy;

/// Default location of the risk model artifact
pub const DEFAULT_ARTIFACT_PATH: &str = "models/risk_model.json";

/// Where the risk model lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderwritingConfig {
    pub rules: RulePolicy,
    pub blend: BlendPolicy,
    pub model: ModelConfig,
}

impl UnderwritingConfig {
    /// Loads configuration from defaults, an optional file and the environment
    ///
    /// # Errors
    ///
    /// Returns `Config` if a source cannot be read or deserialized, and
    /// `InvalidPolicy` if the merged result is incoherent
    pub fn load(file: Option<&Path>) -> Result<Self, UnderwritingError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let loaded: Self = builder
            .add_source(
                config::Environment::with_prefix("UW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("rules.uninsurable_conditions")
                    .with_list_parse_key("rules.referral_conditions"),
            )
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks rule and blend settings for coherence
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolicy` describing the first problem found
    pub fn validate(&self) -> Result<(), UnderwritingError> {
        let rules = &self.rules;
        if rules.min_age > rules.max_age {
            return Err(UnderwritingError::invalid_policy(format!(
                "min_age {} exceeds max_age {}",
                rules.min_age, rules.max_age
            )));
        }
        if rules.max_bmi <= Decimal::ZERO {
            return Err(UnderwritingError::invalid_policy("max_bmi must be positive"));
        }
        if rules.debt_to_income_limit < Decimal::ZERO {
            return Err(UnderwritingError::invalid_policy(
                "debt_to_income_limit must not be negative",
            ));
        }
        if let Some(multiple) = rules.max_auto_coverage_multiple {
            if multiple <= Decimal::ZERO {
                return Err(UnderwritingError::invalid_policy(
                    "max_auto_coverage_multiple must be positive",
                ));
            }
        }
        self.blend.validate()
    }
}
