//! Batch configuration

use serde::Deserialize;

use domain_underwriting::UnderwritingConfig;

use crate::cli::BatchArgs;
use crate::error::BatchError;

/// Process-level settings for the batch runner
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
    /// Emit logs as JSON
    pub log_json: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl BatchConfig {
    /// Loads configuration from `BATCH_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("BATCH").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

/// Engine configuration with command-line overrides applied
///
/// # Errors
///
/// Returns an error if the configuration sources are unreadable or the
/// resulting policy is incoherent
pub fn engine_config(args: &BatchArgs) -> Result<UnderwritingConfig, BatchError> {
    let config = UnderwritingConfig::load(args.config.as_deref())?;
    Ok(apply_overrides(config, args))
}

/// Applies command-line flags on top of a loaded configuration
pub fn apply_overrides(mut config: UnderwritingConfig, args: &BatchArgs) -> UnderwritingConfig {
    if let Some(model) = &args.model {
        config.model.artifact_path = model.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_batch_config() {
        let config = BatchConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
    }

    #[test]
    fn test_model_flag_overrides_artifact_path() {
        let args = BatchArgs {
            model: Some(PathBuf::from("/opt/models/candidate.json")),
            ..BatchArgs::default()
        };

        let config = apply_overrides(UnderwritingConfig::default(), &args);
        assert_eq!(
            config.model.artifact_path,
            PathBuf::from("/opt/models/candidate.json")
        );
    }

    #[test]
    fn test_without_model_flag_artifact_path_is_kept() {
        let loaded = UnderwritingConfig::default();
        let config = apply_overrides(loaded.clone(), &BatchArgs::default());
        assert_eq!(config.model.artifact_path, loaded.model.artifact_path);
    }
}
