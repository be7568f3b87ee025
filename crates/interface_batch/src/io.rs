//! Record decoding and output lines
//!
//! Input is either one JSON array of application payloads or JSON lines, one
//! payload per line. Each output line is a [`BatchLine`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{Read, Write};

use domain_underwriting::DecisionRecord;

use crate::error::BatchError;

/// One decoded input record, or why it could not be decoded
pub type RawRecord = Result<Value, String>;

/// One line of batch output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchLine {
    /// The engine reached a decision
    Decision(DecisionRecord),
    /// The payload was rejected before reaching the engine
    Invalid {
        app_id: Option<String>,
        error: String,
    },
}

impl BatchLine {
    pub fn invalid(app_id: Option<String>, error: impl Into<String>) -> Self {
        Self::Invalid {
            app_id,
            error: error.into(),
        }
    }
}

/// Reads every record from the input
///
/// A malformed JSON line becomes an `Err` record so that one bad line does
/// not sink the batch. A malformed JSON array fails the whole read.
///
/// # Errors
///
/// Returns `Io` if the input cannot be read and `MalformedInput` if it starts
/// as an array but does not parse as one
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<RawRecord>, BatchError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;

    if content.trim_start().starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(&content).map_err(BatchError::MalformedInput)?;
        return Ok(values.into_iter().map(Ok).collect());
    }

    Ok(content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .map_err(|e| format!("line {}: invalid JSON: {}", index + 1, e))
        })
        .collect())
}

/// The `app_id` of a payload, if it carries a string one
pub fn app_id_of(value: &Value) -> Option<String> {
    value.get("app_id").and_then(Value::as_str).map(str::to_string)
}

/// Writes one output line
///
/// # Errors
///
/// Returns `Output` if serialization fails and `Io` if writing fails
pub fn write_line<W: Write>(writer: &mut W, line: &BatchLine) -> Result<(), BatchError> {
    serde_json::to_writer(&mut *writer, line).map_err(BatchError::Output)?;
    writer.write_all(b"\n")?;
    Ok(())
}
