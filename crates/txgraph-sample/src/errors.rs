//! Error types for price and time-bucket resolution.

use thiserror::Error;

/// Errors raised while resolving a time bucket to a price label.
///
/// Both variants are fatal for the affected sample only; the batch run
/// continues with the next anchor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleError {
    /// The bucket never appeared in the time-conversion table.
    #[error("time step {0} is missing from the time-conversion table")]
    MissingTimeStep(i64),

    /// No price observation exists on either side of the bucket's interval,
    /// so not even a fallback estimate can be produced.
    #[error("no price observation on either side of time step {0}")]
    PriceUnavailable(i64),
}
