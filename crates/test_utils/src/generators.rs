//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating applications that satisfy the
//! boundary validation rules.

use domain_underwriting::{Application, Gender, PolicyType};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::TestApplicationBuilder;

/// Strategy for generating genders
pub fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![Just(Gender::Male), Just(Gender::Female), Just(Gender::Other)]
}

/// Strategy for generating policy types
pub fn policy_type_strategy() -> impl Strategy<Value = PolicyType> {
    prop_oneof![
        Just(PolicyType::Term),
        Just(PolicyType::Whole),
        Just(PolicyType::Universal)
    ]
}

/// Strategy for generating ages outside the insurable band
pub fn out_of_band_age_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![0i64..18, 76i64..110]
}

/// Strategy for generating optional credit scores
pub fn credit_score_strategy() -> impl Strategy<Value = Option<u16>> {
    proptest::option::of(300u16..=850)
}

/// Strategy for generating probabilities
pub fn probability_strategy() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

/// Strategy for generating valid applications of any age
///
/// Weight stays between 40 and 180 kg, height between 150 and 200 cm, and
/// coverage within the income multiple.
pub fn application_strategy() -> impl Strategy<Value = Application> {
    (
        (0i64..100, gender_strategy(), 40u32..180, 150u32..200),
        (20_000u32..250_000, 0u32..300_000, credit_score_strategy()),
        (any::<bool>(), policy_type_strategy(), 2u32..=50),
    )
        .prop_map(
            |((age, gender, weight, height), (income, debt, credit), (smoker, policy, multiple))| {
                let income = Decimal::from(income);
                let mut builder = TestApplicationBuilder::new()
                    .with_age(age)
                    .with_gender(gender)
                    .with_weight_kg(Decimal::from(weight))
                    .with_height_cm(Decimal::from(height))
                    .with_income(income)
                    .with_debt(Decimal::from(debt))
                    .with_credit_score(credit)
                    .with_policy_type(policy)
                    .with_coverage(income * Decimal::from(multiple));
                if smoker {
                    builder = builder.smoker();
                }
                builder.build()
            },
        )
}
