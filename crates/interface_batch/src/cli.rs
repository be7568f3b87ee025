//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// Underwrite a batch of insurance applications
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "underwriting-batch",
    about = "Underwrite a batch of insurance applications and print one decision per line",
    version
)]
pub struct BatchArgs {
    /// JSON array or JSON-lines file of applications (stdin if omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Underwriting policy file (TOML, JSON or YAML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the configured risk model artifact
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    pub json_logs: bool,
}
