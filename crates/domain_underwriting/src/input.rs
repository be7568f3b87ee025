//! Wire form of an application
//!
//! Submitting channels send applications as JSON with plain numbers. The
//! payload is range-checked with `validator` and then converted through
//! [`ApplicationBuilder`], which enforces the cross-field limits.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use core_kernel::{decimal_from_f64, ApplicationId};

use crate::application::{Application, ApplicationBuilder, Gender, PolicyType};
use crate::error::UnderwritingError;

/// Application payload as received from a submitting channel
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicationInput {
    #[validate(length(min = 1))]
    pub app_id: String,
    /// Carried for correlation only; never used in decisioning
    #[serde(default)]
    pub applicant_name: Option<String>,
    pub dob: NaiveDate,
    pub gender: Gender,
    #[validate(range(exclusive_min = 20.0, exclusive_max = 300.0))]
    pub weight_kg: f64,
    #[validate(range(exclusive_min = 50.0, exclusive_max = 250.0))]
    pub height_cm: f64,
    /// Defaults to the evaluation date when absent
    #[serde(default)]
    pub submission_date: Option<NaiveDate>,
    #[validate(range(exclusive_min = 0.0))]
    pub annual_income: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub total_debt: f64,
    #[serde(default)]
    #[validate(range(min = 300, max = 850))]
    pub credit_score: Option<u16>,
    pub is_smoker: bool,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    pub policy_type: PolicyType,
    #[validate(range(exclusive_min = 1000.0))]
    pub coverage_amount: f64,
}

impl ApplicationInput {
    /// Validates the payload and converts it into an [`Application`]
    ///
    /// # Arguments
    ///
    /// * `today` - Submission date used when the payload carries none
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error naming the offending field(s)
    pub fn into_application(self, today: NaiveDate) -> Result<Application, UnderwritingError> {
        self.validate().map_err(from_validation_errors)?;

        let id = ApplicationId::new(self.app_id)
            .map_err(|e| UnderwritingError::validation("app_id", e.to_string()))?;

        ApplicationBuilder::new()
            .id(id)
            .date_of_birth(self.dob)
            .submission_date(self.submission_date.unwrap_or(today))
            .gender(self.gender)
            .weight_kg(to_decimal("weight_kg", self.weight_kg)?)
            .height_cm(to_decimal("height_cm", self.height_cm)?)
            .annual_income(to_decimal("annual_income", self.annual_income)?)
            .total_debt(to_decimal("total_debt", self.total_debt)?)
            .credit_score(self.credit_score)
            .smoker(self.is_smoker)
            .medical_conditions(self.medical_conditions)
            .policy_type(self.policy_type)
            .coverage_amount(to_decimal("coverage_amount", self.coverage_amount)?)
            .build()
    }
}

fn to_decimal(field: &str, value: f64) -> Result<rust_decimal::Decimal, UnderwritingError> {
    decimal_from_f64(value).map_err(|e| UnderwritingError::validation(field, e.to_string()))
}

fn from_validation_errors(errors: ValidationErrors) -> UnderwritingError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();
    UnderwritingError::validation(fields.join(", "), errors.to_string())
}
