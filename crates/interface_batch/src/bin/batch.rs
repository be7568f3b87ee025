//! Hybrid Underwriting - Batch Runner Binary
//!
//! Reads application payloads, underwrites them, and prints one JSON line per
//! application.
//!
//! # Usage
//!
//! ```bash
//! # Underwrite a JSON-lines file with the default policy and model
//! underwriting-batch --input applications.jsonl
//!
//! # Pipe a JSON array through a custom policy and candidate model
//! cat apps.json | underwriting-batch --config uw.toml --model models/candidate.json
//! ```
//!
//! # Environment Variables
//!
//! * `BATCH_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `BATCH_LOG_JSON` - Emit JSON logs (default: false)
//! * `UW_*` - Underwriting policy overrides, e.g. `UW_BLEND__REJECT_THRESHOLD=80`

use anyhow::Context;
use clap::Parser;

use interface_batch::{cli::BatchArgs, config::BatchConfig, run, telemetry::init_tracing};

/// Main entry point for the batch runner.
///
/// # Errors
///
/// Returns an error (and a non-zero exit code) if:
/// - The policy configuration cannot be loaded or is incoherent
/// - The risk model artifact is missing or invalid
/// - The input cannot be read
fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let args = BatchArgs::parse();
    let config = BatchConfig::from_env().unwrap_or_default();
    init_tracing(&config.log_level, args.json_logs || config.log_json);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting underwriting batch");

    let summary = run(&args).context("underwriting batch failed")?;

    tracing::info!(
        run_id = %summary.run_id,
        total = summary.total(),
        "Underwriting batch finished"
    );
    Ok(())
}
