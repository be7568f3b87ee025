//! Underwriting service
//!
//! Wires the rule evaluator, the decision blender and the shared estimator
//! handle into the single entry point used by callers.

use rayon::prelude::*;
use std::sync::Arc;

use core_kernel::Clock;

use crate::application::Application;
use crate::blender::DecisionBlender;
use crate::config::UnderwritingConfig;
use crate::decision::DecisionRecord;
use crate::error::UnderwritingError;
use crate::estimator::EstimatorHandle;
use crate::rules::RuleEvaluator;

/// Service for underwriting insurance applications
///
/// Evaluation holds no mutable state, so one service can be shared freely
/// across threads.
///
/// # Example
///
/// ```rust,ignore
/// let config = UnderwritingConfig::load(Some(Path::new("underwriting.toml")))?;
/// let service = UnderwritingService::start(&config)?;
/// let decision = service.evaluate_application(&application)?;
/// println!("{} scored {}", decision.status(), decision.final_score());
/// ```
#[derive(Debug)]
pub struct UnderwritingService {
    evaluator: RuleEvaluator,
    blender: DecisionBlender,
    estimator: Arc<EstimatorHandle>,
}

impl UnderwritingService {
    /// Assembles a service from its parts
    pub fn new(
        evaluator: RuleEvaluator,
        blender: DecisionBlender,
        estimator: Arc<EstimatorHandle>,
    ) -> Self {
        Self {
            evaluator,
            blender,
            estimator,
        }
    }

    /// Builds a service from configuration with a lazily loaded model
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolicy` if the configuration is incoherent
    pub fn from_config(config: &UnderwritingConfig) -> Result<Self, UnderwritingError> {
        config.validate()?;
        Ok(Self::new(
            RuleEvaluator::from_policy(&config.rules),
            DecisionBlender::new(config.blend.clone()),
            Arc::new(EstimatorHandle::from_artifact(&config.model.artifact_path)),
        ))
    }

    /// Builds a service and loads the model immediately
    ///
    /// # Errors
    ///
    /// Fails if the configuration is incoherent or the model artifact is
    /// missing, invalid, or shaped differently from the feature projector
    pub fn start(config: &UnderwritingConfig) -> Result<Self, UnderwritingError> {
        let service = Self::from_config(config)?;
        service.warm_up()?;
        tracing::info!(
            artifact = %config.model.artifact_path.display(),
            rules = ?service.evaluator.rule_names(),
            "Underwriting service started"
        );
        Ok(service)
    }

    /// Replaces the clock used to timestamp decisions
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.blender = self.blender.with_clock(clock);
        self
    }

    /// Forces the estimator to load
    pub fn warm_up(&self) -> Result<(), UnderwritingError> {
        self.estimator.get().map(|_| ())
    }

    pub fn rule_evaluator(&self) -> &RuleEvaluator {
        &self.evaluator
    }

    pub fn blender(&self) -> &DecisionBlender {
        &self.blender
    }

    pub fn estimator(&self) -> &Arc<EstimatorHandle> {
        &self.estimator
    }

    /// Evaluates an application: rules first, then the model if needed
    ///
    /// # Errors
    ///
    /// Only configuration errors; rejections and referrals are decisions
    pub fn evaluate_application(
        &self,
        application: &Application,
    ) -> Result<DecisionRecord, UnderwritingError> {
        let span = tracing::info_span!("underwrite", application_id = %application.id());
        let _guard = span.enter();

        let outcome = self.evaluator.evaluate(application);
        tracing::debug!(status = ?outcome.status(), rule_score = outcome.score(), "Rules evaluated");

        self.blender.decide(application, outcome, &self.estimator)
    }

    /// Evaluates many applications in parallel, preserving input order
    pub fn evaluate_batch(
        &self,
        applications: &[Application],
    ) -> Vec<Result<DecisionRecord, UnderwritingError>> {
        applications
            .par_iter()
            .map(|application| self.evaluate_application(application))
            .collect()
    }
}
