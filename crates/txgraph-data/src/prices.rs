//! Price-file intake.
//!
//! The price file is comma-delimited with a header line; each data row
//! carries a human-readable timestamp in column 0 and the price in column 1.
//! Extra trailing columns are tolerated. Rows are returned in file order —
//! the producer gives no sortedness guarantee, and downstream lookup
//! explicitly documents its scan order as implementation-defined.

use std::path::Path;

use tracing::info;

use crate::error::DataError;
use crate::types::PriceRow;

/// Parses a timestamp string into Unix seconds.
///
/// Accepts RFC 3339 (`2021-03-08T23:00:00Z`), the bare
/// `YYYY-MM-DD HH:MM:SS` form interpreted as UTC, or an already-numeric
/// epoch-seconds value.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if let Ok(instant) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.timestamp());
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc().timestamp());
    }
    trimmed.parse::<i64>().ok()
}

/// Reads and parses a price file.
///
/// # Errors
/// Returns [`DataError::MalformedRow`] on the first row with a missing or
/// unparseable timestamp or price; the run aborts rather than sampling from
/// a partial series.
pub fn read_price_rows(path: &Path) -> Result<Vec<PriceRow>, DataError> {
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
        if parts.len() < 2 {
            return Err(DataError::malformed(
                path,
                line_number,
                format!("expected at least 2 fields, found {}", parts.len()),
            ));
        }

        let timestamp = parse_timestamp(parts[0]).ok_or_else(|| {
            DataError::malformed(path, line_number, format!("bad timestamp {:?}", parts[0]))
        })?;
        let price: f64 = parts[1].trim().parse().map_err(|_| {
            DataError::malformed(path, line_number, format!("bad price {:?}", parts[1]))
        })?;

        rows.push(PriceRow { timestamp, price });
    }

    info!(
        observations = rows.len(),
        path = %path.display(),
        "price file loaded"
    );
    Ok(rows)
}
