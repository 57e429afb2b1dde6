//! Writing a finished run.

use crate::error::{OemsError, Result};
use crate::network::{RunReport, Value};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// How the sorted result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Echo line of the raw input, then one sorted value per line.
    #[default]
    Lines,
    /// One JSON object with `input`, `sorted` and per-node `traces`.
    Json,
}

/// Values joined by single spaces.
pub fn echo_line(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write `report` to `out` in the chosen format.
pub fn write_report<W: Write>(mut out: W, report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Lines => {
            writeln!(out, "{}", echo_line(&report.input))?;
            for value in &report.sorted {
                writeln!(out, "{}", value)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, report)
                .map_err(|e| OemsError::Serialization(e.to_string()))?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
