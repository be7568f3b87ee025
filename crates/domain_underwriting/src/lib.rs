//! Hybrid Underwriting Domain
//!
//! This crate decides insurance applications by combining deterministic
//! underwriting rules with a trained risk model.
//!
//! # Decision Flow
//!
//! ```text
//! Application -> RuleEvaluator --Reject--> DecisionRecord (REJECT, 100)
//!                     |
//!                     +---Refer--> DecisionRecord (MANUAL_REVIEW)
//!                     |
//!                  Proceed -> project -> ProbabilityEstimator -> DecisionBlender -> DecisionRecord
//! ```
//!
//! All stages are pure functions of their inputs plus the shared, read-only
//! estimator, so applications can be evaluated concurrently without locking.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_underwriting::{UnderwritingConfig, UnderwritingService};
//!
//! let service = UnderwritingService::start(&UnderwritingConfig::default())?;
//! let decision = service.evaluate_application(&application)?;
//! for reason in decision.reasons() {
//!     println!("- {reason}");
//! }
//! ```

pub mod application;
pub mod input;
pub mod rules;
pub mod features;
pub mod estimator;
pub mod model;
pub mod blender;
pub mod decision;
pub mod config;
pub mod error;
pub mod services;

pub use application::{Application, ApplicationBuilder, Gender, PolicyType};
pub use input::ApplicationInput;
pub use rules::{
    RuleEffect, RuleEvaluator, RuleOutcome, RulePolicy, RuleStatus, UnderwritingRule,
};
pub use features::{project, FeatureVector, FEATURE_SCHEMA};
pub use estimator::{EstimatorHandle, ProbabilityEstimator};
pub use model::LogisticRiskModel;
pub use blender::{BlendPolicy, DecisionBlender};
pub use decision::{Decision, DecisionRecord, RiskSource, ScoreBreakdown};
pub use config::{ModelConfig, UnderwritingConfig};
pub use error::{ErrorKind, UnderwritingError};
pub use services::UnderwritingService;
