//! Memoized price lookup per time bucket.
//!
//! Observations are scanned linearly per uncached bucket and the resolved
//! price is cached, exact match or fallback alike. The same buckets are
//! queried for thousands of anchors, so the cache carries the whole run.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;
use txgraph_data::types::PriceRow;

use crate::errors::SampleError;
use crate::time_index::TimeStepIndex;

/// Price series with a per-bucket memo cache.
///
/// Lookup goes through the time-bucket index to translate the bucket into a
/// real-time interval, then scans the observations once. The cache is a
/// concurrent map with insert-if-absent semantics: concurrent misses on the
/// same bucket may both compute, but they compute the same value, so last
/// writer wins harmlessly and no reader ever sees a partial entry.
pub struct PriceSeries {
    observations: Vec<PriceRow>,
    cache: DashMap<i64, f64>,
    scans: AtomicU64,
}

impl PriceSeries {
    /// Wraps the parsed observations, kept in whatever order the producer
    /// supplied them.
    pub fn new(observations: Vec<PriceRow>) -> Self {
        Self {
            observations,
            cache: DashMap::new(),
            scans: AtomicU64::new(0),
        }
    }

    /// Number of observations held.
    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }

    /// Number of full observation scans performed so far. A cached lookup
    /// does not scan.
    pub fn scan_count(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }

    /// Resolves the price for a time bucket.
    ///
    /// The first observation whose timestamp falls inside the bucket's
    /// half-open interval wins. "First" means first in the producer's order,
    /// which is not guaranteed chronological — an implementation-defined tie
    /// break inherited from the unsorted upstream file.
    ///
    /// When no observation lands inside the interval, the result is the mean
    /// of the nearest observation strictly before the interval and the
    /// nearest at-or-after its end; if only one side exists, that side's
    /// price is used as-is.
    ///
    /// # Errors
    /// [`SampleError::MissingTimeStep`] if the bucket is not in the
    /// conversion table, [`SampleError::PriceUnavailable`] if no observation
    /// exists on either side of the interval.
    pub fn price_at(&self, index: &TimeStepIndex, time_step: i64) -> Result<f64, SampleError> {
        if let Some(price) = self.cache.get(&time_step) {
            return Ok(*price);
        }

        let interval = index.interval_for(time_step)?;
        self.scans.fetch_add(1, Ordering::Relaxed);

        let mut before: Option<&PriceRow> = None;
        let mut after: Option<&PriceRow> = None;
        for observation in &self.observations {
            if observation.timestamp >= interval.min_timestamp
                && observation.timestamp < interval.max_timestamp
            {
                self.cache.insert(time_step, observation.price);
                return Ok(observation.price);
            }
            if observation.timestamp < interval.min_timestamp {
                if before.map_or(true, |b| observation.timestamp > b.timestamp) {
                    before = Some(observation);
                }
            } else if after.map_or(true, |a| observation.timestamp < a.timestamp) {
                after = Some(observation);
            }
        }

        let price = match (before, after) {
            (Some(b), Some(a)) => (b.price + a.price) / 2.0,
            (Some(b), None) => b.price,
            (None, Some(a)) => a.price,
            (None, None) => return Err(SampleError::PriceUnavailable(time_step)),
        };

        debug!(
            time_step,
            price, "no observation inside bucket interval, using nearest-neighbor estimate"
        );
        self.cache.insert(time_step, price);
        Ok(price)
    }
}
