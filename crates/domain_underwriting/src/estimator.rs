//! Probability estimator port
//!
//! The engine treats the risk model as an opaque, versioned component that
//! maps a [`FeatureVector`] to the probability that the applicant is high
//! risk. Implementations are shared read-only across threads.
//!
//! [`EstimatorHandle`] holds the estimator for the lifetime of the process.
//! It is initialised at most once, either eagerly ([`EstimatorHandle::ready`])
//! or on first use through a loader, and the feature layout is verified at
//! that moment so a mismatched model fails loudly instead of mis-predicting.

use once_cell::sync::OnceCell;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::UnderwritingError;
use crate::features::{verify_feature_schema, FeatureVector};
use crate::model::LogisticRiskModel;

/// A trained risk model
pub trait ProbabilityEstimator: Send + Sync {
    /// Feature names the model was fit on, in order
    fn feature_names(&self) -> Vec<String>;

    /// Probability in `[0, 1]` that the applicant is high risk
    fn estimate(&self, features: &FeatureVector) -> Result<f64, UnderwritingError>;

    /// Artifact version, for audit logs
    fn version(&self) -> &str {
        "unversioned"
    }
}

type Loader =
    Box<dyn Fn() -> Result<Arc<dyn ProbabilityEstimator>, UnderwritingError> + Send + Sync>;

/// Initialise-once holder of the process-wide estimator
pub struct EstimatorHandle {
    cell: OnceCell<Arc<dyn ProbabilityEstimator>>,
    loader: Option<Loader>,
}

impl EstimatorHandle {
    /// Wraps an already constructed estimator
    ///
    /// # Errors
    ///
    /// Returns `FeatureShapeMismatch` if the estimator's layout differs from
    /// the feature projector's
    pub fn ready(estimator: Arc<dyn ProbabilityEstimator>) -> Result<Self, UnderwritingError> {
        verify_feature_schema(&estimator.feature_names())?;
        Ok(Self {
            cell: OnceCell::with_value(estimator),
            loader: None,
        })
    }

    /// Defers construction to the first call of [`EstimatorHandle::get`]
    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ProbabilityEstimator>, UnderwritingError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            loader: Some(Box::new(loader)),
        }
    }

    /// Lazily loads a [`LogisticRiskModel`] artifact from disk
    pub fn from_artifact(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::lazy(move || {
            let model = LogisticRiskModel::from_file(&path)?;
            Ok(Arc::new(model) as Arc<dyn ProbabilityEstimator>)
        })
    }

    /// Returns the estimator, initialising it on first use
    ///
    /// A failed initialisation is not cached; the error is returned to the
    /// caller and the next call tries again.
    pub fn get(&self) -> Result<&Arc<dyn ProbabilityEstimator>, UnderwritingError> {
        self.cell.get_or_try_init(|| {
            let loader = self.loader.as_ref().ok_or_else(|| {
                UnderwritingError::invalid_artifact("estimator handle has no loader")
            })?;
            let estimator = loader()?;
            verify_feature_schema(&estimator.feature_names())?;
            tracing::info!(version = estimator.version(), "Risk model initialised");
            Ok(estimator)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl fmt::Debug for EstimatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EstimatorHandle")
            .field("initialized", &self.is_initialized())
            .field("lazy", &self.loader.is_some())
            .finish()
    }
}
