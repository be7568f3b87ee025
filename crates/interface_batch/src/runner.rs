//! Batch execution
//!
//! Decodes and validates every record, evaluates the valid ones in parallel
//! through [`UnderwritingService::evaluate_batch`], and writes one line per
//! record in input order.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::{Read, Write};

use core_kernel::{BatchRunId, Clock};
use domain_underwriting::{
    Application, ApplicationInput, Decision, UnderwritingError, UnderwritingService,
};

use crate::error::BatchError;
use crate::io::{app_id_of, read_records, write_line, BatchLine, RawRecord};

/// Counts of a finished batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub run_id: BatchRunId,
    pub accepted: usize,
    pub rejected: usize,
    pub manual_review: usize,
    pub invalid: usize,
}

impl BatchSummary {
    fn new(run_id: BatchRunId) -> Self {
        Self {
            run_id,
            accepted: 0,
            rejected: 0,
            manual_review: 0,
            invalid: 0,
        }
    }

    fn record(&mut self, line: &BatchLine) {
        match line {
            BatchLine::Decision(decision) => match decision.status() {
                Decision::Accept => self.accepted += 1,
                Decision::Reject => self.rejected += 1,
                Decision::ManualReview => self.manual_review += 1,
            },
            BatchLine::Invalid { .. } => self.invalid += 1,
        }
    }

    /// Number of records processed
    pub fn total(&self) -> usize {
        self.accepted + self.rejected + self.manual_review + self.invalid
    }
}

/// Where each record's output line comes from
enum Slot {
    Evaluated,
    Invalid(BatchLine),
}

fn decode(record: RawRecord, today: NaiveDate) -> Result<Application, BatchLine> {
    let value = record.map_err(|message| BatchLine::invalid(None, message))?;
    let app_id = app_id_of(&value);

    let input: ApplicationInput = serde_json::from_value(value)
        .map_err(|e| BatchLine::invalid(app_id.clone(), format!("invalid payload: {e}")))?;

    input
        .into_application(today)
        .map_err(|e| BatchLine::invalid(app_id, e.to_string()))
}

/// Underwrites every record read from `reader` and writes the results
///
/// Submission dates missing from payloads default to `clock`'s today.
///
/// # Errors
///
/// Fails on unreadable input, on write failures, and on the first
/// configuration error raised by the engine. Invalid payloads are reported
/// as output lines instead.
pub fn run_batch<R: Read, W: Write>(
    service: &UnderwritingService,
    clock: &dyn Clock,
    reader: R,
    writer: &mut W,
) -> Result<BatchSummary, BatchError> {
    let run_id = BatchRunId::new_v7();
    let span = tracing::info_span!("batch", run_id = %run_id);
    let _guard = span.enter();

    let records = read_records(reader)?;
    let today = clock.today();
    tracing::info!(records = records.len(), "Batch input decoded");

    let mut applications = Vec::with_capacity(records.len());
    let slots: Vec<Slot> = records
        .into_iter()
        .map(|record| match decode(record, today) {
            Ok(application) => {
                applications.push(application);
                Slot::Evaluated
            }
            Err(line) => Slot::Invalid(line),
        })
        .collect();

    // Results come back in the order of `applications`, which is slot order
    let mut decisions = service
        .evaluate_batch(&applications)
        .into_iter()
        .collect::<Result<Vec<_>, UnderwritingError>>()?
        .into_iter();

    let mut summary = BatchSummary::new(run_id);
    for slot in slots {
        let line = match slot {
            Slot::Evaluated => match decisions.next() {
                Some(decision) => BatchLine::Decision(decision),
                None => break,
            },
            Slot::Invalid(line) => {
                if let BatchLine::Invalid { app_id, error } = &line {
                    tracing::warn!(app_id = ?app_id, error = %error, "Application failed validation");
                }
                line
            }
        };
        summary.record(&line);
        write_line(writer, &line)?;
    }
    writer.flush()?;

    tracing::info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        manual_review = summary.manual_review,
        invalid = summary.invalid,
        "Batch complete"
    );
    Ok(summary)
}
