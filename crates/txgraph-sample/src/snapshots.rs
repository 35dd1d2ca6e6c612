//! Per-bucket graph snapshots of the transfer history.
//!
//! Slices the raw records into one graph per observed time bucket by
//! re-running the edge generator with a bucket-selecting exclusion
//! predicate. Useful for eyeballing how activity is distributed over time
//! before committing to sampling hyperparameters.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;
use txgraph_data::transactions::EdgeGenerator;
use txgraph_data::types::TransferRecord;

use crate::graph::TemporalMultigraph;

/// One graph per observed time bucket, in ascending bucket order.
pub struct TimeSeriesGraphs {
    graphs: BTreeMap<i64, TemporalMultigraph>,
}

impl TimeSeriesGraphs {
    /// Builds snapshots for the first `limit` observed buckets (all of them
    /// when `limit` is `None`), ascending.
    ///
    /// Each pass re-runs the shared generator with an exclusion predicate
    /// that keeps only that bucket's rows; interning is idempotent, so the
    /// address indices agree across snapshots and with any full graph built
    /// from the same generator.
    pub fn build(
        generator: &mut EdgeGenerator,
        records: &[TransferRecord],
        limit: Option<usize>,
    ) -> Self {
        let observed: BTreeSet<i64> = records.iter().map(|r| r.time_step).collect();
        let selected: Vec<i64> = observed
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .collect();

        let mut graphs = BTreeMap::new();
        for bucket in selected {
            let graph = TemporalMultigraph::from_edges(
                generator.generate_edges(records, move |_, _, _, time_step| time_step != bucket),
            );
            graphs.insert(bucket, graph);
        }

        info!(buckets = graphs.len(), "built per-bucket snapshots");
        Self { graphs }
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Snapshot for one bucket, if that bucket was observed and selected.
    pub fn get(&self, bucket: i64) -> Option<&TemporalMultigraph> {
        self.graphs.get(&bucket)
    }

    /// Snapshots in ascending bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &TemporalMultigraph)> {
        self.graphs.iter().map(|(bucket, graph)| (*bucket, graph))
    }
}
