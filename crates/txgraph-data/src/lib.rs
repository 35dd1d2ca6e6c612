//! txgraph-data crate
//!
//! Row sources for the transaction-graph pipeline: delimited-file readers,
//! address interning, and the raw record types shared by downstream crates.

pub mod error;
pub mod prices;
pub mod timesteps;
pub mod transactions;
pub mod types;

pub use error::DataError;
pub use types::{PriceRow, TimeStepRow, TransferEdge, TransferRecord};
