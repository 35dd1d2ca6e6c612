//! Windowed k-hop neighborhood sampling around anchor nodes.
//!
//! For every anchor `(node, time bucket)` pair the sampler expands a bounded
//! neighborhood: a level-synchronous sweep that only follows edges inside
//! the anchor's time window and caps the per-node fan-out in each direction
//! to keep hub addresses from swallowing the sample.
//!
//! All randomness flows through one seeded generator created before any
//! sampling begins. Draw order is fixed: anchor-predecessor draw, one
//! anchor-bucket draw per slot, then per expanded node the incoming
//! resample followed by the outgoing resample, level by level. Combined
//! with the deterministic neighbor and frontier orders of
//! [`TemporalMultigraph`], a seed pins the entire run's output.

use std::collections::{BTreeSet, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use txgraph_data::types::TransferEdge;

use crate::graph::TemporalMultigraph;

/// Hyperparameters of one sampling run.
#[derive(Clone, Copy, Debug)]
pub struct SampleParams {
    /// Number of expansion levels around the anchor.
    pub k_hop: u32,
    /// Window width `W`: an edge qualifies when
    /// `anchor - W <= edge.time_step <= anchor`.
    pub time_window: i64,
    /// Maximum incoming edges retained per expanded node.
    pub in_cap: usize,
    /// Maximum outgoing edges retained per expanded node.
    pub out_cap: usize,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            k_hop: 5,
            time_window: 168, // one week of hourly buckets
            in_cap: 5,
            out_cap: 5,
        }
    }
}

/// One sampled directed edge, carrying its original payload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EgoEdge {
    /// Source node (dense address index).
    pub from: u32,
    /// Target node (dense address index).
    pub to: u32,
    /// Transferred amount.
    pub amount: f64,
    /// Time bucket of the transfer.
    pub time_step: i64,
}

/// The sampled subgraph around one anchor.
///
/// The edge list may contain duplicates: over-cap fan-out is resampled with
/// replacement, and repeated picks are kept on purpose.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EgoGraph {
    /// Anchor node the expansion started from.
    pub anchor: u32,
    /// Anchor time bucket the window is measured against.
    pub anchor_time_step: i64,
    /// Sampled edges in retention order.
    pub edges: Vec<EgoEdge>,
}

impl EgoGraph {
    /// Distinct nodes touched by the sample, anchor included.
    pub fn nodes(&self) -> BTreeSet<u32> {
        let mut nodes = BTreeSet::new();
        nodes.insert(self.anchor);
        for edge in &self.edges {
            nodes.insert(edge.from);
            nodes.insert(edge.to);
        }
        nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Produces ego graphs from a full multigraph.
pub struct NeighborhoodSampler<'g> {
    graph: &'g TemporalMultigraph,
    params: SampleParams,
    rng: StdRng,
}

impl<'g> NeighborhoodSampler<'g> {
    /// Creates a sampler over `graph`, seeding the generator exactly once.
    pub fn new(graph: &'g TemporalMultigraph, params: SampleParams, seed: u64) -> Self {
        Self {
            graph,
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws the anchor time buckets for a node.
    ///
    /// Picks one predecessor uniformly at random, collects the time buckets
    /// of every parallel edge from that predecessor, and draws one bucket
    /// uniformly per slot in that collection — repeats are expected, and the
    /// draw deliberately does not enumerate the distinct buckets.
    ///
    /// A node with no predecessors has no meaningful anchor bucket and gets
    /// an empty draw.
    pub fn anchor_time_steps(&mut self, node: u32) -> Vec<i64> {
        let predecessors: Vec<u32> = self.graph.predecessors(node).into_iter().collect();
        if predecessors.is_empty() {
            return Vec::new();
        }

        let predecessor = predecessors[self.rng.gen_range(0..predecessors.len())];
        let buckets: Vec<i64> = self
            .graph
            .edges_between(predecessor, node)
            .iter()
            .map(|e| e.time_step)
            .collect();

        (0..buckets.len())
            .map(|_| buckets[self.rng.gen_range(0..buckets.len())])
            .collect()
    }

    /// Draws anchors for `node` and expands one ego graph per drawn bucket.
    pub fn sample_node(&mut self, node: u32) -> Vec<EgoGraph> {
        self.anchor_time_steps(node)
            .into_iter()
            .map(|anchor_time_step| self.expand(node, anchor_time_step))
            .collect()
    }

    /// Expands the neighborhood around one `(anchor, bucket)` pair.
    ///
    /// The visited set is the global claim set of the whole expansion: a
    /// node is claimed when it first enters the sample (as the anchor or as
    /// a retained-candidate endpoint) and is expanded at most once, on the
    /// level after its claim. Claimed nodes are never offered as candidates
    /// again, which also means a candidate dropped by the fan-out resample
    /// stays claimed and is permanently out of the sample. The frontier can
    /// only shrink to nodes never seen before, so the sweep terminates on
    /// any finite graph.
    pub fn expand(&mut self, anchor: u32, anchor_time_step: i64) -> EgoGraph {
        let mut edges: Vec<EgoEdge> = Vec::new();
        let mut visited: HashSet<u32> = HashSet::new();
        let mut frontier: BTreeSet<u32> = BTreeSet::new();
        visited.insert(anchor);
        frontier.insert(anchor);

        let mut remaining = self.params.k_hop;
        while remaining > 0 && !frontier.is_empty() {
            let mut next_frontier: BTreeSet<u32> = BTreeSet::new();

            for &node in &frontier {
                let incoming = self.incoming_candidates(node, anchor_time_step, &mut visited);
                let incoming = self.resample(incoming, self.params.in_cap);
                let outgoing = self.outgoing_candidates(node, anchor_time_step, &mut visited);
                let outgoing = self.resample(outgoing, self.params.out_cap);

                for (predecessor, edge) in incoming {
                    edges.push(EgoEdge {
                        from: predecessor,
                        to: node,
                        amount: edge.amount,
                        time_step: edge.time_step,
                    });
                    next_frontier.insert(predecessor);
                }
                for (successor, edge) in outgoing {
                    edges.push(EgoEdge {
                        from: node,
                        to: successor,
                        amount: edge.amount,
                        time_step: edge.time_step,
                    });
                    next_frontier.insert(successor);
                }
            }

            frontier = next_frontier;
            remaining -= 1;
        }

        EgoGraph {
            anchor,
            anchor_time_step,
            edges,
        }
    }

    /// Unclaimed predecessors of `node` with an in-window edge, each claimed
    /// on discovery and contributing its first in-window parallel edge.
    fn incoming_candidates(
        &self,
        node: u32,
        anchor_time_step: i64,
        visited: &mut HashSet<u32>,
    ) -> Vec<(u32, TransferEdge)> {
        let mut candidates = Vec::new();
        for predecessor in self.graph.predecessors(node) {
            if visited.contains(&predecessor) {
                continue;
            }
            let in_window = self
                .graph
                .edges_between(predecessor, node)
                .into_iter()
                .find(|e| self.in_window(e.time_step, anchor_time_step));
            if let Some(edge) = in_window {
                visited.insert(predecessor);
                candidates.push((predecessor, *edge));
            }
        }
        candidates
    }

    fn outgoing_candidates(
        &self,
        node: u32,
        anchor_time_step: i64,
        visited: &mut HashSet<u32>,
    ) -> Vec<(u32, TransferEdge)> {
        let mut candidates = Vec::new();
        for successor in self.graph.successors(node) {
            if visited.contains(&successor) {
                continue;
            }
            let in_window = self
                .graph
                .edges_between(node, successor)
                .into_iter()
                .find(|e| self.in_window(e.time_step, anchor_time_step));
            if let Some(edge) = in_window {
                visited.insert(successor);
                candidates.push((successor, *edge));
            }
        }
        candidates
    }

    fn in_window(&self, time_step: i64, anchor_time_step: i64) -> bool {
        anchor_time_step - self.params.time_window <= time_step && time_step <= anchor_time_step
    }

    /// Caps a candidate list by drawing `cap` picks with replacement.
    ///
    /// Duplicate picks land in the output as duplicate edges; that is the
    /// intended capping policy, not an oversight.
    fn resample(
        &mut self,
        candidates: Vec<(u32, TransferEdge)>,
        cap: usize,
    ) -> Vec<(u32, TransferEdge)> {
        if candidates.len() <= cap {
            return candidates;
        }
        (0..cap)
            .map(|_| candidates[self.rng.gen_range(0..candidates.len())])
            .collect()
    }
}
