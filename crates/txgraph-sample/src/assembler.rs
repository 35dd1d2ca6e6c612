//! Turns sampled ego graphs into price-labeled training samples.

use serde::Serialize;

use crate::errors::SampleError;
use crate::price::PriceSeries;
use crate::sampler::EgoGraph;
use crate::time_index::TimeStepIndex;

/// An ego graph labeled with the price at `anchor + prediction_horizon`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabeledSample {
    /// The sampled subgraph.
    pub ego: EgoGraph,
    /// Bucket the label price was resolved at.
    pub future_time_step: i64,
    /// Label: price at the future bucket.
    pub future_price: f64,
}

/// Attaches forward-looking price labels to ego graphs.
pub struct SampleAssembler<'a> {
    time_index: &'a TimeStepIndex,
    prices: &'a PriceSeries,
    prediction_horizon: i64,
}

impl<'a> SampleAssembler<'a> {
    pub fn new(
        time_index: &'a TimeStepIndex,
        prices: &'a PriceSeries,
        prediction_horizon: i64,
    ) -> Self {
        Self {
            time_index,
            prices,
            prediction_horizon,
        }
    }

    /// Labels one ego graph, a pure transformation of its input.
    ///
    /// Returns `Ok(None)` when the future bucket lies beyond the largest
    /// known bucket — there is nothing to label with, and the sample is
    /// silently dropped rather than treated as an error.
    ///
    /// # Errors
    /// [`SampleError::MissingTimeStep`] or [`SampleError::PriceUnavailable`]
    /// from the price lookup; both doom only this sample.
    pub fn label(&self, ego: EgoGraph) -> Result<Option<LabeledSample>, SampleError> {
        let future_time_step = ego.anchor_time_step + self.prediction_horizon;

        let Some(max_time_step) = self.time_index.max_time_step() else {
            return Ok(None);
        };
        if future_time_step > max_time_step {
            return Ok(None);
        }

        let future_price = self.prices.price_at(self.time_index, future_time_step)?;
        Ok(Some(LabeledSample {
            ego,
            future_time_step,
            future_price,
        }))
    }
}
