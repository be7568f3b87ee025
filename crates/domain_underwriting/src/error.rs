//! Underwriting domain errors
//!
//! Business outcomes (accept, reject, manual review) are never errors. What
//! remains falls into two kinds: validation errors for malformed applications,
//! and configuration errors for a mis-wired engine (model artifact, feature
//! schema, policy settings). Neither kind is retried.

use thiserror::Error;

/// Broad classification of an [`UnderwritingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
}

/// Errors that can occur in the underwriting domain
#[derive(Debug, Error)]
pub enum UnderwritingError {
    /// A field of the application is malformed or out of range
    #[error("Validation error on {field}: {message}")]
    Validation {
        field: String,
        message: String,
    },

    /// A required field was never supplied
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Estimator and feature projector disagree on the feature layout
    #[error("Feature shape mismatch: estimator expects {expected:?}, projector produces {actual:?}")]
    FeatureShapeMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Model artifact file does not exist
    #[error("Model artifact not found at {0}")]
    ArtifactMissing(String),

    /// Model artifact exists but cannot be used
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// Estimator produced something that is not a probability
    #[error("Estimator returned {0}, expected a probability in [0, 1]")]
    ProbabilityOutOfRange(f64),

    /// Policy settings are incoherent
    #[error("Invalid underwriting policy: {0}")]
    InvalidPolicy(String),

    /// Configuration sources could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl UnderwritingError {
    /// Creates a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        UnderwritingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid policy error
    pub fn invalid_policy(message: impl Into<String>) -> Self {
        UnderwritingError::InvalidPolicy(message.into())
    }

    /// Creates an invalid artifact error
    pub fn invalid_artifact(message: impl Into<String>) -> Self {
        UnderwritingError::InvalidArtifact(message.into())
    }

    /// Returns the kind of failure
    ///
    /// A record missing a required field never reaches the rules, so it is
    /// treated as a wiring problem of the caller rather than bad data.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UnderwritingError::Validation { .. } => ErrorKind::Validation,
            _ => ErrorKind::Configuration,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
