//! Stub Probability Estimators
//!
//! Deterministic stand-ins for the trained model.

use domain_underwriting::features::feature_names;
use domain_underwriting::{
    EstimatorHandle, FeatureVector, ProbabilityEstimator, UnderwritingError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Always returns the same probability
#[derive(Debug, Clone, Copy)]
pub struct FixedProbabilityEstimator(pub f64);

impl ProbabilityEstimator for FixedProbabilityEstimator {
    fn feature_names(&self) -> Vec<String> {
        feature_names()
    }

    fn estimate(&self, _features: &FeatureVector) -> Result<f64, UnderwritingError> {
        Ok(self.0)
    }

    fn version(&self) -> &str {
        "fixed"
    }
}

/// Returns a fixed probability and counts calls
#[derive(Debug)]
pub struct CountingEstimator {
    probability: f64,
    calls: AtomicUsize,
}

impl CountingEstimator {
    pub fn new(probability: f64) -> Arc<Self> {
        Arc::new(Self {
            probability,
            calls: AtomicUsize::new(0),
        })
    }

    /// Number of `estimate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProbabilityEstimator for CountingEstimator {
    fn feature_names(&self) -> Vec<String> {
        feature_names()
    }

    fn estimate(&self, _features: &FeatureVector) -> Result<f64, UnderwritingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.probability)
    }
}

/// Trained on a different feature layout
#[derive(Debug, Clone, Copy)]
pub struct WrongShapeEstimator;

impl ProbabilityEstimator for WrongShapeEstimator {
    fn feature_names(&self) -> Vec<String> {
        let mut names = feature_names();
        names.swap(0, 1);
        names
    }

    fn estimate(&self, _features: &FeatureVector) -> Result<f64, UnderwritingError> {
        Ok(0.5)
    }
}

/// Handle around a fixed-probability estimator
///
/// # Panics
///
/// Never in practice; the stub always matches the projector layout
pub fn fixed_handle(probability: f64) -> Arc<EstimatorHandle> {
    Arc::new(
        EstimatorHandle::ready(Arc::new(FixedProbabilityEstimator(probability)))
            .expect("stub layout matches projector"),
    )
}
