//! Raw record types produced by the row sources.

use serde::{Deserialize, Serialize};

/// One parsed transfer row: `from,to,amount,time_step`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Sender address as it appears in the source file.
    pub from_address: String,
    /// Recipient address as it appears in the source file.
    pub to_address: String,
    /// Transferred amount.
    pub amount: f64,
    /// Discrete time bucket the transfer falls into.
    pub time_step: i64,
}

/// Edge payload carried by every transfer in the multigraph.
///
/// Parallel edges between the same address pair are expected — the same pair
/// can transact repeatedly, in the same bucket or across buckets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferEdge {
    /// Transferred amount.
    pub amount: f64,
    /// Discrete time bucket of the transfer.
    pub time_step: i64,
}

/// One parsed price observation: absolute instant plus price.
///
/// Rows are kept in file order; the producer gives no sortedness guarantee.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    /// Observation instant in Unix seconds.
    pub timestamp: i64,
    /// Observed price.
    pub price: f64,
}

/// One parsed time-conversion row mapping a bucket to its real-time interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeStepRow {
    /// Discrete time bucket.
    pub time_step: i64,
    /// Inclusive interval start in Unix seconds.
    pub min_timestamp: i64,
    /// Exclusive interval end in Unix seconds.
    pub max_timestamp: i64,
}
