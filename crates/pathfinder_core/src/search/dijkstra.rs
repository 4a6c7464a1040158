use std::collections::BinaryHeap;

use crate::constants::Weight;
use crate::error::SearchError;
use crate::graph::*;
use crate::search::best_first::{BestFirstSearch, Candidate, SearchParams};
use crate::search::shortest_path::ShortestPath;
use crate::statistics::SearchStats;
use log::debug;

/// Dijkstra's algorithm, i.e. best-first search without a heuristic.
pub struct Dijkstra<'a> {
    engine: BestFirstSearch<'a>,
}

impl<'a> Dijkstra<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Dijkstra {
            engine: BestFirstSearch::new(graph),
        }
    }

    pub fn with_params(graph: &'a Graph, params: SearchParams) -> Self {
        Dijkstra {
            engine: BestFirstSearch::with_params(graph, params),
        }
    }

    pub fn stats(&self) -> &SearchStats {
        &self.engine.stats
    }

    pub fn search(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Result<Option<ShortestPath>, SearchError> {
        self.engine.search(source, target, |_| 0.0)
    }

    /// Exact cost of the cheapest path from every node to `target`, computed
    /// by one exhaustive search over the incoming arcs. Unreachable nodes get
    /// `Weight::INFINITY`.
    pub fn distances_to(&self, target: NodeIndex) -> Result<Vec<Weight>, SearchError> {
        let g = self.engine.graph();
        if !g.contains(target) {
            return Err(SearchError::UnknownNode(target));
        }

        let mut distances = vec![Weight::INFINITY; g.num_nodes()];
        let mut settled = vec![false; g.num_nodes()];
        let mut queue = BinaryHeap::new();
        let mut seq = 0;

        distances[target.index()] = 0.0;
        queue.push(Candidate::new(target, 0.0, seq));

        while let Some(Candidate {
            node,
            estimated_weight: weight,
            ..
        }) = queue.pop()
        {
            if settled[node.index()] {
                continue;
            }
            settled[node.index()] = true;

            for (_, edge) in g.neighbors_incoming(node) {
                let new_distance = weight + edge.weight;
                if new_distance < distances[edge.source.index()] {
                    distances[edge.source.index()] = new_distance;
                    seq += 1;
                    queue.push(Candidate::new(edge.source, new_distance, seq));
                }
            }
        }

        debug!(
            "{} nodes can reach {:?}",
            settled.iter().filter(|s| **s).count(),
            target
        );
        Ok(distances)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        edge,
        search::{assert_no_path, assert_path},
        util::test_graphs::{generate_complex_graph, generate_simple_graph},
    };

    use super::*;

    #[test]
    fn simple_path() {
        //      7 -> 8 -> 9
        //      |         |
        // 0 -> 5 -> 6 -  |
        // |         |  \ |
        // 1 -> 2 -> 3 -> 4
        let mut g = Graph::new();

        for i in 0..10 {
            g.add_node(Node::new(i, 0.0, 0.0));
        }

        g.add_edge(Edge::new(node_index(0), node_index(1), 1.0));
        g.add_edge(Edge::new(node_index(1), node_index(2), 1.0));
        g.add_edge(Edge::new(node_index(2), node_index(3), 1.0));
        g.add_edge(Edge::new(node_index(3), node_index(4), 20.0));
        g.add_edge(Edge::new(node_index(0), node_index(5), 5.0));
        g.add_edge(Edge::new(node_index(5), node_index(6), 1.0));
        g.add_edge(Edge::new(node_index(6), node_index(4), 20.0));
        g.add_edge(Edge::new(node_index(6), node_index(3), 20.0));
        g.add_edge(Edge::new(node_index(5), node_index(7), 5.0));
        g.add_edge(Edge::new(node_index(7), node_index(8), 1.0));
        g.add_edge(Edge::new(node_index(8), node_index(9), 1.0));
        g.add_edge(Edge::new(node_index(9), node_index(4), 1.0));

        let mut d = Dijkstra::new(&g);

        assert_no_path(d.search(node_index(4), node_index(0))); // Cannot be reached
        assert_path(vec![0, 5, 7, 8, 9, 4], 13.0, d.search(0.into(), 4.into()));
        assert_path(vec![6, 3], 20.0, d.search(6.into(), 3.into()));
        assert_path(vec![4], 0.0, d.search(4.into(), 4.into()));
        assert_path(vec![1, 2, 3, 4], 22.0, d.search(1.into(), 4.into()));
    }

    #[test]
    fn disconnected_graph() {
        // 0 -> 1 -> 2
        // 3 -> 4 -> 5
        let mut g = Graph::new();
        for i in 0..6 {
            g.add_node(Node::new(i, 0.0, 0.0));
        }

        g.add_edge(Edge::new(node_index(0), node_index(1), 1.0));
        g.add_edge(Edge::new(node_index(1), node_index(2), 1.0));
        g.add_edge(Edge::new(node_index(3), node_index(4), 3.0));
        g.add_edge(Edge::new(node_index(4), node_index(5), 1.0));

        let mut d = Dijkstra::new(&g);

        assert_no_path(d.search(0.into(), 3.into()));
        assert_no_path(d.search(3.into(), 0.into()));
        assert_path(vec![0, 1, 2], 2.0, d.search(0.into(), 2.into()));
        assert_path(vec![3, 4, 5], 4.0, d.search(3.into(), 5.into()));
    }

    #[test]
    fn go_around() {
        // 0 -> 1
        // |    |
        // 2 -> 3
        let mut g = Graph::new();
        let a = g.add_node(Node::new(0, 0.0, 0.0));
        let b = g.add_node(Node::new(1, 0.0, 0.0));
        let c = g.add_node(Node::new(2, 0.0, 0.0));
        let d = g.add_node(Node::new(3, 0.0, 0.0));

        g.add_edge(Edge::new(a, b, 10.0));
        g.add_edge(Edge::new(a, c, 1.0));
        g.add_edge(Edge::new(c, d, 1.0));
        g.add_edge(Edge::new(d, b, 1.0));

        let mut d = Dijkstra::new(&g);

        assert_path(vec![0, 2, 3, 1], 3.0, d.search(a, b));
    }

    #[test]
    fn one_way_entry() {
        let g = generate_simple_graph();
        let mut d = Dijkstra::new(&g);

        assert_path(vec![4, 0, 2, 1], 3.0, d.search(4.into(), 1.into()));
        assert_no_path(d.search(1.into(), 4.into()));
    }

    #[test]
    fn parallel_edges_use_cheapest() {
        let mut g = Graph::new();
        g.add_edge(edge!(0 => 1, 5.0));
        g.add_edge(edge!(0 => 1, 2.0));
        g.add_edge(edge!(0 => 1, 3.0));

        let mut d = Dijkstra::new(&g);
        assert_path(vec![0, 1], 2.0, d.search(0.into(), 1.into()));
    }

    #[test]
    fn distances_to_target() {
        // 0 -> 1
        // |    |
        // 2 -> 3    4
        let mut g = Graph::new();
        g.add_edge(edge!(0 => 1, 10.0));
        g.add_edge(edge!(0 => 2, 1.0));
        g.add_edge(edge!(2 => 3, 1.0));
        g.add_edge(edge!(3 => 1, 1.0));
        g.add_node(Node::new(4, 0.0, 0.0));

        let d = Dijkstra::new(&g);
        let distances = d.distances_to(node_index(1)).unwrap();

        assert_eq!(distances, vec![3.0, 0.0, 2.0, 1.0, Weight::INFINITY]);
        assert_eq!(
            d.distances_to(node_index(5)),
            Err(SearchError::UnknownNode(node_index(5)))
        );
    }

    #[test]
    fn distances_agree_with_search() {
        let g = generate_complex_graph();
        let target = node_index(6);

        let mut d = Dijkstra::new(&g);
        let distances = d.distances_to(target).unwrap();

        for source in 0..g.num_nodes() {
            let sp = d.search(node_index(source), target).unwrap().unwrap();
            approx::assert_abs_diff_eq!(sp.weight, distances[source], epsilon = 1e-9);
        }
    }
}
