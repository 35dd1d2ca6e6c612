//! Time-bucket index: discrete buckets to real-time intervals.

use std::collections::HashMap;

use txgraph_data::types::TimeStepRow;

use crate::errors::SampleError;

/// Half-open real-time interval `[min_timestamp, max_timestamp)` covered by
/// one time bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeStepInterval {
    /// Inclusive start in Unix seconds.
    pub min_timestamp: i64,
    /// Exclusive end in Unix seconds.
    pub max_timestamp: i64,
}

/// Lookup from time bucket to its real-time interval.
///
/// Also tracks the smallest and largest bucket ever inserted; the upper
/// bound gates sample emission — an anchor whose prediction horizon lands
/// beyond it has no future price to label with.
#[derive(Debug, Default)]
pub struct TimeStepIndex {
    intervals: HashMap<i64, TimeStepInterval>,
    min_time_step: Option<i64>,
    max_time_step: Option<i64>,
}

impl TimeStepIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from parsed time-conversion rows.
    pub fn from_rows(rows: impl IntoIterator<Item = TimeStepRow>) -> Self {
        let mut index = Self::new();
        for row in rows {
            index.insert(
                row.time_step,
                TimeStepInterval {
                    min_timestamp: row.min_timestamp,
                    max_timestamp: row.max_timestamp,
                },
            );
        }
        index
    }

    /// Inserts one bucket. A repeated bucket overwrites its interval; the
    /// conversion table is trusted to be well-formed (monotone intervals,
    /// no conflicting duplicates), and that is not re-verified here.
    pub fn insert(&mut self, time_step: i64, interval: TimeStepInterval) {
        self.min_time_step = Some(match self.min_time_step {
            Some(min) => min.min(time_step),
            None => time_step,
        });
        self.max_time_step = Some(match self.max_time_step {
            Some(max) => max.max(time_step),
            None => time_step,
        });
        self.intervals.insert(time_step, interval);
    }

    /// Resolves a bucket to its real-time interval.
    ///
    /// # Errors
    /// [`SampleError::MissingTimeStep`] if the bucket never appeared in the
    /// conversion table.
    pub fn interval_for(&self, time_step: i64) -> Result<TimeStepInterval, SampleError> {
        self.intervals
            .get(&time_step)
            .copied()
            .ok_or(SampleError::MissingTimeStep(time_step))
    }

    /// Smallest bucket ever inserted.
    pub fn min_time_step(&self) -> Option<i64> {
        self.min_time_step
    }

    /// Largest bucket ever inserted.
    pub fn max_time_step(&self) -> Option<i64> {
        self.max_time_step
    }

    /// Number of distinct buckets.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
