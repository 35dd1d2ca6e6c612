//! Shared test helpers and fixture builders.
//!
//! Provides factory functions for transfer records, on-disk CSV fixtures,
//! and small deterministic graphs used across the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;
use txgraph_data::types::{TransferEdge, TransferRecord};
use txgraph_sample::graph::TemporalMultigraph;

/// Creates a transfer record with the given endpoints, amount, and bucket.
pub fn record(from: &str, to: &str, amount: f64, time_step: i64) -> TransferRecord {
    TransferRecord {
        from_address: from.to_owned(),
        to_address: to.to_owned(),
        amount,
        time_step,
    }
}

/// Writes `content` to `name` inside `dir` and returns the path.
pub fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("fixture file should write");
    path
}

/// Renders records as a transfer CSV with a header line.
pub fn transfer_csv(records: &[TransferRecord]) -> String {
    let mut out = String::from("from_address,to_address,amount,time_step\n");
    for r in records {
        out.push_str(&format!(
            "{},{},{},{}\n",
            r.from_address, r.to_address, r.amount, r.time_step
        ));
    }
    out
}

/// Renders a time-conversion CSV mapping bucket `t` to `[t*100, (t+1)*100)`
/// for every bucket in `0..=max_bucket`. Timestamps are epoch seconds.
pub fn bucket_table_csv(max_bucket: i64) -> String {
    let mut out = String::from("time_step,min_timestamp,max_timestamp\n");
    for t in 0..=max_bucket {
        out.push_str(&format!("{},{},{}\n", t, t * 100, (t + 1) * 100));
    }
    out
}

/// Renders a price CSV from `(epoch_seconds, price)` pairs, in given order.
pub fn price_csv(observations: &[(i64, f64)]) -> String {
    let mut out = String::from("timestamp,price\n");
    for (timestamp, price) in observations {
        out.push_str(&format!("{},{}\n", timestamp, price));
    }
    out
}

/// Builds a deterministic pseudo-random multigraph with `nodes` nodes and
/// `edges` edges whose buckets cycle over `0..bucket_count`. A fixed linear
/// congruence drives the topology, so every run sees the same graph.
pub fn scrambled_graph(nodes: u32, edges: u32, bucket_count: i64) -> TemporalMultigraph {
    let mut state: u64 = 0x5eed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as u32
    };

    let mut triples = Vec::new();
    for i in 0..edges {
        let from = next() % nodes;
        let to = next() % nodes;
        triples.push((
            from,
            to,
            TransferEdge {
                amount: (i + 1) as f64,
                time_step: (next() as i64) % bucket_count,
            },
        ));
    }
    TemporalMultigraph::from_edges(triples)
}
