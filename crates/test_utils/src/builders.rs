//! Test Data Builders
//!
//! Provides a builder for constructing applications with sensible defaults.
//! Tests specify only the fields that matter to them; everything else is a
//! clean applicant who triggers no rule.

use chrono::{Duration, NaiveDate};
use core_kernel::ApplicationId;
use domain_underwriting::{Application, ApplicationBuilder, Gender, PolicyType};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::TemporalFixtures;

/// Builder for constructing test applications
///
/// Defaults: age 30, 81 kg, 180 cm (BMI 25), income 60,000, no debt,
/// credit score 720, non-smoker, no conditions, term cover of 600,000.
#[derive(Debug, Clone)]
pub struct TestApplicationBuilder {
    app_id: String,
    submission_date: NaiveDate,
    age_years: i64,
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

impl Default for TestApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApplicationBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            app_id: "test-app-001".to_string(),
            submission_date: TemporalFixtures::submission_date(),
            age_years: 30,
            gender: Gender::Male,
            weight_kg: dec!(81),
            height_cm: dec!(180),
            annual_income: dec!(60000),
            total_debt: Decimal::ZERO,
            credit_score: Some(720),
            is_smoker: false,
            medical_conditions: Vec::new(),
            policy_type: PolicyType::Term,
            coverage_amount: dec!(600000),
        }
    }

    /// Sets the application id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.app_id = id.into();
        self
    }

    /// Sets the age in whole 365-day years at submission
    pub fn with_age(mut self, years: i64) -> Self {
        self.age_years = years;
        self
    }

    /// Sets the submission date; the date of birth moves with it
    pub fn with_submission_date(mut self, date: NaiveDate) -> Self {
        self.submission_date = date;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_weight_kg(mut self, weight: Decimal) -> Self {
        self.weight_kg = weight;
        self
    }

    pub fn with_height_cm(mut self, height: Decimal) -> Self {
        self.height_cm = height;
        self
    }

    pub fn with_income(mut self, income: Decimal) -> Self {
        self.annual_income = income;
        self
    }

    pub fn with_debt(mut self, debt: Decimal) -> Self {
        self.total_debt = debt;
        self
    }

    /// Sets debt so that debt / income equals `ratio`
    pub fn with_debt_to_income(mut self, ratio: Decimal) -> Self {
        self.total_debt = self.annual_income * ratio;
        self
    }

    pub fn with_credit_score(mut self, score: Option<u16>) -> Self {
        self.credit_score = score;
        self
    }

    pub fn smoker(mut self) -> Self {
        self.is_smoker = true;
        self
    }

    /// Adds a disclosed medical condition
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.medical_conditions.push(condition.into());
        self
    }

    pub fn with_policy_type(mut self, policy_type: PolicyType) -> Self {
        self.policy_type = policy_type;
        self
    }

    pub fn with_coverage(mut self, amount: Decimal) -> Self {
        self.coverage_amount = amount;
        self
    }

    /// Date of birth implied by the age and submission date
    pub fn date_of_birth(&self) -> NaiveDate {
        self.submission_date - Duration::days(self.age_years * 365)
    }

    /// Builds the application
    ///
    /// # Panics
    ///
    /// Panics if the configured values do not form a valid application
    pub fn build(self) -> Application {
        ApplicationBuilder::new()
            .id(ApplicationId::new(self.app_id.clone()).expect("test app id must not be blank"))
            .date_of_birth(self.date_of_birth())
            .submission_date(self.submission_date)
            .gender(self.gender)
            .weight_kg(self.weight_kg)
            .height_cm(self.height_cm)
            .annual_income(self.annual_income)
            .total_debt(self.total_debt)
            .credit_score(self.credit_score)
            .smoker(self.is_smoker)
            .medical_conditions(self.medical_conditions)
            .policy_type(self.policy_type)
            .coverage_amount(self.coverage_amount)
            .build()
            .expect("test application must be valid")
    }

    /// Renders the application as a wire payload
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "app_id": self.app_id,
            "applicant_name": "Applicant_1001",
            "dob": self.date_of_birth().to_string(),
            "gender": self.gender.as_str(),
            "weight_kg": self.weight_kg.to_f64(),
            "height_cm": self.height_cm.to_f64(),
            "submission_date": self.submission_date.to_string(),
            "annual_income": self.annual_income.to_f64(),
            "total_debt": self.total_debt.to_f64(),
            "credit_score": self.credit_score,
            "is_smoker": self.is_smoker,
            "medical_conditions": self.medical_conditions,
            "policy_type": self.policy_type.as_str(),
            "coverage_amount": self.coverage_amount.to_f64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_clean() {
        let app = TestApplicationBuilder::new().build();
        assert_eq!(app.age(), 30);
        assert_eq!(app.bmi(), dec!(25));
        assert_eq!(app.debt_to_income_ratio(), Decimal::ZERO);
    }

    #[test]
    fn test_debt_to_income() {
        let app = TestApplicationBuilder::new()
            .with_debt_to_income(dec!(0.7))
            .build();
        assert_eq!(app.total_debt(), dec!(42000));
    }
}
