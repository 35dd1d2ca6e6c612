//! Time-conversion-file intake.
//!
//! Maps each discrete time bucket to the half-open real-time interval
//! `[min_timestamp, max_timestamp)` it covers. The file is comma-delimited
//! with a header line: `time_step,min_timestamp,max_timestamp`. Intervals
//! are trusted to be monotone in `time_step`; this is not re-verified here.

use std::path::Path;

use tracing::info;

use crate::error::DataError;
use crate::prices::parse_timestamp;
use crate::types::TimeStepRow;

/// Reads and parses a time-conversion file.
///
/// # Errors
/// Returns [`DataError::MalformedRow`] on the first row with a wrong field
/// count or an unparseable bucket/timestamp.
pub fn read_time_step_rows(path: &Path) -> Result<Vec<TimeStepRow>, DataError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rows = Vec::new();
    for (line_number, line) in content.lines().enumerate() {
        if line_number == 0 {
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').collect();
        if parts.len() != 3 {
            return Err(DataError::malformed(
                path,
                line_number,
                format!("expected 3 fields, found {}", parts.len()),
            ));
        }

        let time_step: i64 = parts[0].trim().parse().map_err(|_| {
            DataError::malformed(path, line_number, format!("bad time_step {:?}", parts[0]))
        })?;
        let min_timestamp = parse_timestamp(parts[1]).ok_or_else(|| {
            DataError::malformed(
                path,
                line_number,
                format!("bad min_timestamp {:?}", parts[1]),
            )
        })?;
        let max_timestamp = parse_timestamp(parts[2]).ok_or_else(|| {
            DataError::malformed(
                path,
                line_number,
                format!("bad max_timestamp {:?}", parts[2]),
            )
        })?;

        rows.push(TimeStepRow {
            time_step,
            min_timestamp,
            max_timestamp,
        });
    }

    info!(
        buckets = rows.len(),
        path = %path.display(),
        "time-conversion file loaded"
    );
    Ok(rows)
}
