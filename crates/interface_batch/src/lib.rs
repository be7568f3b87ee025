//! Batch Underwriting Interface
//!
//! This crate exposes the underwriting engine as a command-line batch job.
//! Applications arrive as a JSON array or JSON lines, are evaluated in
//! parallel, and leave as one JSON line each on stdout.
//!
//! # Architecture
//!
//! - **CLI**: argument parsing
//! - **Config**: process settings and the engine configuration overrides
//! - **IO**: record decoding and output lines
//! - **Runner**: validation, evaluation and the run summary
//! - **Telemetry**: tracing subscriber setup
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_batch::{cli::BatchArgs, run};
//!
//! let summary = run(&BatchArgs::default())?;
//! println!("{} decisions", summary.total());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod runner;
pub mod telemetry;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};

use core_kernel::SystemClock;
use domain_underwriting::UnderwritingService;

use crate::cli::BatchArgs;
pub use crate::error::BatchError;
pub use crate::io::BatchLine;
pub use crate::runner::{run_batch, BatchSummary};

/// Runs one batch as described by the command-line arguments
///
/// Loads the engine configuration, starts the service (which loads the risk
/// model), then streams decisions to stdout.
///
/// # Errors
///
/// Returns an error if the configuration or model cannot be loaded, the input
/// cannot be read, or a decision fails for a configuration reason
pub fn run(args: &BatchArgs) -> Result<BatchSummary, BatchError> {
    let engine_config = config::engine_config(args)?;
    let service = UnderwritingService::start(&engine_config)?;

    let reader: Box<dyn Read> = match &args.input {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reading applications from file");
            Box::new(BufReader::new(File::open(path)?))
        }
        None => {
            tracing::info!("Reading applications from stdin");
            Box::new(std::io::stdin().lock())
        }
    };

    let mut writer = BufWriter::new(std::io::stdout().lock());
    run_batch(&service, &SystemClock, reader, &mut writer)
}
