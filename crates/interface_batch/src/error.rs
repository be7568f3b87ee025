//! Batch error handling

use thiserror::Error;

use domain_underwriting::UnderwritingError;

/// Errors that abort a batch run
///
/// Invalid applications are not errors here; they are reported per line.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Underwriting error: {0}")]
    Underwriting(#[from] UnderwritingError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Input is not a valid JSON array: {0}")]
    MalformedInput(#[source] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[source] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
