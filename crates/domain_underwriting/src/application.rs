//! Insurance application record
//!
//! An [`Application`] can only be obtained through [`ApplicationBuilder`],
//! which enforces every field range and the coverage-to-income limit. Once
//! built the record is immutable; age, BMI and debt-to-income are derived on
//! demand and never stored.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{round_half_even, whole_years_between, ApplicationId};

use crate::error::UnderwritingError;

/// Maximum coverage as a multiple of annual income
pub const MAX_COVERAGE_INCOME_MULTIPLE: Decimal = dec!(50);

/// Minimum coverage that can be requested (exclusive)
pub const MIN_COVERAGE_AMOUNT: Decimal = dec!(1000);

/// Gender options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of life policy requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyType {
    Term,
    Whole,
    Universal,
}

impl PolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::Term => "Term",
            PolicyType::Whole => "Whole",
            PolicyType::Universal => "Universal",
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated insurance application
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    id: ApplicationId,
    date_of_birth: NaiveDate,
    submission_date: NaiveDate,
    gender: Gender,
    weight_kg: Decimal,
    height_cm: Decimal,
    annual_income: Decimal,
    total_debt: Decimal,
    credit_score: Option<u16>,
    is_smoker: bool,
    medical_conditions: Vec<String>,
    policy_type: PolicyType,
    coverage_amount: Decimal,
}

impl Application {
    pub fn id(&self) -> &ApplicationId {
        &self.id
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn submission_date(&self) -> NaiveDate {
        self.submission_date
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn weight_kg(&self) -> Decimal {
        self.weight_kg
    }

    pub fn height_cm(&self) -> Decimal {
        self.height_cm
    }

    pub fn annual_income(&self) -> Decimal {
        self.annual_income
    }

    pub fn total_debt(&self) -> Decimal {
        self.total_debt
    }

    pub fn credit_score(&self) -> Option<u16> {
        self.credit_score
    }

    pub fn is_smoker(&self) -> bool {
        self.is_smoker
    }

    pub fn medical_conditions(&self) -> &[String] {
        &self.medical_conditions
    }

    pub fn policy_type(&self) -> PolicyType {
        self.policy_type
    }

    pub fn coverage_amount(&self) -> Decimal {
        self.coverage_amount
    }

    /// Age in whole 365-day years at the submission date
    pub fn age(&self) -> i64 {
        whole_years_between(self.date_of_birth, self.submission_date)
    }

    /// Body mass index, rounded to 2 decimal places
    pub fn bmi(&self) -> Decimal {
        let height_m = self.height_cm / dec!(100);
        round_half_even(self.weight_kg / (height_m * height_m), 2)
    }

    /// Total debt over annual income, rounded to 2 decimal places
    ///
    /// Zero when income is zero.
    pub fn debt_to_income_ratio(&self) -> Decimal {
        if self.annual_income.is_zero() {
            return Decimal::ZERO;
        }
        round_half_even(self.total_debt / self.annual_income, 2)
    }

    /// Requested coverage as a multiple of annual income, rounded to 2 decimal places
    pub fn coverage_income_multiple(&self) -> Decimal {
        if self.annual_income.is_zero() {
            return Decimal::ZERO;
        }
        round_half_even(self.coverage_amount / self.annual_income, 2)
    }
}

/// Builder for [`Application`]
///
/// # Example
///
/// ```rust,ignore
/// let application = ApplicationBuilder::new()
///     .id(ApplicationId::new("a1b2c3d4")?)
///     .date_of_birth(dob)
///     .submission_date(today)
///     .gender(Gender::Female)
///     .weight_kg(dec!(64))
///     .height_cm(dec!(168))
///     .annual_income(dec!(72000))
///     .policy_type(PolicyType::Term)
///     .coverage_amount(dec!(500000))
///     .smoker(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApplicationBuilder {
    id: Option<ApplicationId>,
    date_of_birth: Option<NaiveDate>,
    submission_date: Option<NaiveDate>,
    gender: Option<Gender>,
    weight_kg: Option<Decimal>,
    height_cm: Option<Decimal>,
    annual_income: Option<Decimal>,
    total_debt: Decimal,
    credit_score: Option<u16>,
    is_smoker: Option<bool>,
    medical_conditions: Vec<String>,
    policy_type: Option<PolicyType>,
    coverage_amount: Option<Decimal>,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: ApplicationId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn date_of_birth(mut self, dob: NaiveDate) -> Self {
        self.date_of_birth = Some(dob);
        self
    }

    pub fn submission_date(mut self, date: NaiveDate) -> Self {
        self.submission_date = Some(date);
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn weight_kg(mut self, weight: Decimal) -> Self {
        self.weight_kg = Some(weight);
        self
    }

    pub fn height_cm(mut self, height: Decimal) -> Self {
        self.height_cm = Some(height);
        self
    }

    pub fn annual_income(mut self, income: Decimal) -> Self {
        self.annual_income = Some(income);
        self
    }

    /// Sets total debt (defaults to zero)
    pub fn total_debt(mut self, debt: Decimal) -> Self {
        self.total_debt = debt;
        self
    }

    pub fn credit_score(mut self, score: Option<u16>) -> Self {
        self.credit_score = score;
        self
    }

    pub fn smoker(mut self, is_smoker: bool) -> Self {
        self.is_smoker = Some(is_smoker);
        self
    }

    /// Appends a disclosed medical condition
    pub fn medical_condition(mut self, condition: impl Into<String>) -> Self {
        self.medical_conditions.push(condition.into());
        self
    }

    /// Replaces the disclosed medical conditions
    pub fn medical_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.medical_conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    pub fn policy_type(mut self, policy_type: PolicyType) -> Self {
        self.policy_type = Some(policy_type);
        self
    }

    pub fn coverage_amount(mut self, amount: Decimal) -> Self {
        self.coverage_amount = Some(amount);
        self
    }

    /// Validates and builds the application
    ///
    /// # Errors
    ///
    /// - `MissingRequiredField` if a required field was not set
    /// - `Validation` naming the first field that is out of range
    pub fn build(self) -> Result<Application, UnderwritingError> {
        let id = self.id.ok_or_else(|| missing("app_id"))?;
        let date_of_birth = self.date_of_birth.ok_or_else(|| missing("dob"))?;
        let submission_date = self.submission_date.ok_or_else(|| missing("submission_date"))?;
        let gender = self.gender.ok_or_else(|| missing("gender"))?;
        let weight_kg = self.weight_kg.ok_or_else(|| missing("weight_kg"))?;
        let height_cm = self.height_cm.ok_or_else(|| missing("height_cm"))?;
        let annual_income = self.annual_income.ok_or_else(|| missing("annual_income"))?;
        let is_smoker = self.is_smoker.ok_or_else(|| missing("is_smoker"))?;
        let policy_type = self.policy_type.ok_or_else(|| missing("policy_type"))?;
        let coverage_amount = self.coverage_amount.ok_or_else(|| missing("coverage_amount"))?;

        if weight_kg <= dec!(20) || weight_kg >= dec!(300) {
            return Err(UnderwritingError::validation(
                "weight_kg",
                format!("{weight_kg} must be greater than 20 and less than 300"),
            ));
        }
        if height_cm <= dec!(50) || height_cm >= dec!(250) {
            return Err(UnderwritingError::validation(
                "height_cm",
                format!("{height_cm} must be greater than 50 and less than 250"),
            ));
        }
        if annual_income <= Decimal::ZERO {
            return Err(UnderwritingError::validation(
                "annual_income",
                format!("{annual_income} must be greater than 0"),
            ));
        }
        if self.total_debt < Decimal::ZERO {
            return Err(UnderwritingError::validation(
                "total_debt",
                format!("{} must not be negative", self.total_debt),
            ));
        }
        if let Some(score) = self.credit_score {
            if !(300..=850).contains(&score) {
                return Err(UnderwritingError::validation(
                    "credit_score",
                    format!("{score} must be between 300 and 850"),
                ));
            }
        }
        if coverage_amount <= MIN_COVERAGE_AMOUNT {
            return Err(UnderwritingError::validation(
                "coverage_amount",
                format!("{coverage_amount} must be greater than {MIN_COVERAGE_AMOUNT}"),
            ));
        }
        if coverage_amount > annual_income * MAX_COVERAGE_INCOME_MULTIPLE {
            return Err(UnderwritingError::validation(
                "coverage_amount",
                format!(
                    "Coverage {coverage_amount} exceeds {MAX_COVERAGE_INCOME_MULTIPLE}x income limit."
                ),
            ));
        }

        Ok(Application {
            id,
            date_of_birth,
            submission_date,
            gender,
            weight_kg,
            height_cm,
            annual_income,
            total_debt: self.total_debt,
            credit_score: self.credit_score,
            is_smoker,
            medical_conditions: self.medical_conditions,
            policy_type,
            coverage_amount,
        })
    }
}

fn missing(field: &str) -> UnderwritingError {
    UnderwritingError::MissingRequiredField(field.to_string())
}
