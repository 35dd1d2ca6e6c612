//! Temporal transfer multigraph over the full dataset.
//!
//! Nodes are dense address indices; edges are individual transfers carrying
//! their amount and time bucket. Parallel edges are intentional — the same
//! ordered address pair can transact many times, in the same bucket or
//! across buckets, and nothing is deduplicated.
//!
//! Neighbor sets and parallel-edge sequences come back in a deterministic
//! order (ascending node index, file insertion order) so that a seeded
//! sampling run over the same input reproduces the same draws.

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use txgraph_data::types::TransferEdge;

/// Directed multigraph of all transfers, indexed by endpoint.
///
/// Uses `add_edge` (not `update_edge`) to preserve parallel edges. Edges are
/// never removed after insertion.
pub struct TemporalMultigraph {
    graph: DiGraph<u32, TransferEdge>,
    node_ix: HashMap<u32, NodeIndex>,
    min_time_step: Option<i64>,
    max_time_step: Option<i64>,
}

impl TemporalMultigraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_ix: HashMap::new(),
            min_time_step: None,
            max_time_step: None,
        }
    }

    /// Builds the graph from a lazily-produced sequence of edge triples.
    ///
    /// Accepts whatever indices and edges the generator supplies; no
    /// filtering or validation happens here.
    pub fn from_edges(edges: impl IntoIterator<Item = (u32, u32, TransferEdge)>) -> Self {
        let mut graph = Self::new();
        for (from, to, edge) in edges {
            graph.add_edge(from, to, edge);
        }
        graph
    }

    /// Inserts one transfer edge, creating endpoints as needed.
    pub fn add_edge(&mut self, from: u32, to: u32, edge: TransferEdge) {
        let graph = &mut self.graph;
        let from_ix = *self
            .node_ix
            .entry(from)
            .or_insert_with(|| graph.add_node(from));
        let to_ix = *self.node_ix.entry(to).or_insert_with(|| graph.add_node(to));

        self.min_time_step = Some(match self.min_time_step {
            Some(min) => min.min(edge.time_step),
            None => edge.time_step,
        });
        self.max_time_step = Some(match self.max_time_step {
            Some(max) => max.max(edge.time_step),
            None => edge.time_step,
        });

        graph.add_edge(from_ix, to_ix, edge);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn has_node(&self, node: u32) -> bool {
        self.node_ix.contains_key(&node)
    }

    /// All node indices in insertion (first-seen) order.
    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.graph.node_indices().map(move |ix| self.graph[ix])
    }

    /// Distinct predecessors of `node`, ascending.
    pub fn predecessors(&self, node: u32) -> BTreeSet<u32> {
        self.neighbors(node, Direction::Incoming)
    }

    /// Distinct successors of `node`, ascending.
    pub fn successors(&self, node: u32) -> BTreeSet<u32> {
        self.neighbors(node, Direction::Outgoing)
    }

    fn neighbors(&self, node: u32, direction: Direction) -> BTreeSet<u32> {
        match self.node_ix.get(&node) {
            Some(&ix) => self
                .graph
                .neighbors_directed(ix, direction)
                .map(|n| self.graph[n])
                .collect(),
            None => BTreeSet::new(),
        }
    }

    /// All parallel edges from `a` to `b` in insertion order.
    ///
    /// May be empty; may contain several edges with the same time bucket.
    pub fn edges_between(&self, a: u32, b: u32) -> Vec<&TransferEdge> {
        let (Some(&a_ix), Some(&b_ix)) = (self.node_ix.get(&a), self.node_ix.get(&b)) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest-first; reverse to file order.
        let mut edges: Vec<&TransferEdge> = self
            .graph
            .edges_connecting(a_ix, b_ix)
            .map(|e| e.weight())
            .collect();
        edges.reverse();
        edges
    }

    /// Smallest time bucket observed across all inserted edges.
    pub fn min_time_step(&self) -> Option<i64> {
        self.min_time_step
    }

    /// Largest time bucket observed across all inserted edges.
    pub fn max_time_step(&self) -> Option<i64> {
        self.max_time_step
    }
}

impl Default for TemporalMultigraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(amount: f64, time_step: i64) -> TransferEdge {
        TransferEdge { amount, time_step }
    }

    #[test]
    fn parallel_edges_preserved() {
        let graph = TemporalMultigraph::from_edges(vec![
            (0, 1, edge(10.0, 3)),
            (0, 1, edge(5.0, 3)),
            (0, 1, edge(7.0, 8)),
        ]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edges_between(0, 1).len(), 3);
        assert!(graph.edges_between(1, 0).is_empty());
    }

    #[test]
    fn edges_between_in_insertion_order() {
        let graph = TemporalMultigraph::from_edges(vec![
            (0, 1, edge(1.0, 1)),
            (0, 1, edge(2.0, 2)),
            (0, 1, edge(3.0, 3)),
        ]);

        let steps: Vec<i64> = graph
            .edges_between(0, 1)
            .iter()
            .map(|e| e.time_step)
            .collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }

    #[test]
    fn neighbor_sets_are_deduplicated_and_sorted() {
        let graph = TemporalMultigraph::from_edges(vec![
            (5, 1, edge(1.0, 1)),
            (3, 1, edge(1.0, 2)),
            (5, 1, edge(1.0, 3)), // parallel, same predecessor
            (1, 9, edge(1.0, 4)),
        ]);

        let preds: Vec<u32> = graph.predecessors(1).into_iter().collect();
        assert_eq!(preds, vec![3, 5]);

        let succs: Vec<u32> = graph.successors(1).into_iter().collect();
        assert_eq!(succs, vec![9]);

        assert!(graph.predecessors(42).is_empty());
    }

    #[test]
    fn tracks_time_step_extrema() {
        let graph = TemporalMultigraph::from_edges(vec![
            (0, 1, edge(1.0, 7)),
            (1, 2, edge(1.0, 2)),
            (2, 0, edge(1.0, 11)),
        ]);

        assert_eq!(graph.min_time_step(), Some(2));
        assert_eq!(graph.max_time_step(), Some(11));

        // Every stored edge lies within the global bounds.
        for a in graph.nodes().collect::<Vec<_>>() {
            for b in graph.nodes().collect::<Vec<_>>() {
                for e in graph.edges_between(a, b) {
                    assert!(e.time_step >= 2 && e.time_step <= 11);
                }
            }
        }
    }

    #[test]
    fn empty_graph_has_no_extrema() {
        let graph = TemporalMultigraph::new();
        assert_eq!(graph.min_time_step(), None);
        assert_eq!(graph.max_time_step(), None);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn nodes_iterate_in_first_seen_order() {
        let graph = TemporalMultigraph::from_edges(vec![
            (7, 2, edge(1.0, 1)),
            (2, 5, edge(1.0, 1)),
        ]);
        let nodes: Vec<u32> = graph.nodes().collect();
        assert_eq!(nodes, vec![7, 2, 5]);
    }
}
