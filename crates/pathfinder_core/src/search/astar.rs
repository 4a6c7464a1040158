//! Implementation of the A* search algorithm.
use crate::{
    constants::Weight,
    error::SearchError,
    graph::{Graph, Node, NodeIndex},
    heuristic::HeuristicTable,
    search::best_first::{BestFirstSearch, SearchParams},
    statistics::SearchStats,
};

use super::shortest_path::ShortestPath;

pub struct AStar<'a> {
    engine: BestFirstSearch<'a>,
}

impl<'a> AStar<'a> {
    pub fn new(g: &'a Graph) -> Self {
        AStar {
            engine: BestFirstSearch::new(g),
        }
    }

    pub fn with_params(g: &'a Graph, params: SearchParams) -> Self {
        AStar {
            engine: BestFirstSearch::with_params(g, params),
        }
    }

    pub fn stats(&self) -> &SearchStats {
        &self.engine.stats
    }

    /// A* with an estimate per node. The estimate is assumed to belong to
    /// `target`, this is not checked.
    pub fn search(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        heuristic: impl Fn(NodeIndex) -> Weight,
    ) -> Result<Option<ShortestPath>, SearchError> {
        self.engine.search(source, target, heuristic)
    }

    /// A* with a precomputed table, missing entries count as 0.
    pub fn search_with_table(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        table: &HeuristicTable,
    ) -> Result<Option<ShortestPath>, SearchError> {
        self.engine
            .search(source, target, |node| table.estimate(node))
    }

    /// A* with an estimate between two nodes, e.g. a straight line distance.
    /// Slots without a node get an estimate of 0.
    pub fn search_by_nodes(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        heuristic: impl Fn(&Node, &Node) -> Weight,
    ) -> Result<Option<ShortestPath>, SearchError> {
        let g = self.engine.graph();
        let goal = g.node(target);

        self.engine.search(source, target, |node| match (g.node(node), goal) {
            (Some(node), Some(goal)) => heuristic(node, goal),
            _ => 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        graph::{node_index, Edge},
        heuristic::euclidean,
        search::{assert_no_path, assert_path, dijkstra::Dijkstra},
        util::{
            math::straight_line,
            test_graphs::{generate_diamond_graph, random_geometric_graph},
        },
    };

    use super::*;

    fn null_heuristic(_: NodeIndex) -> Weight {
        0.0
    }

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

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

        let mut astar = AStar::new(&g);

        assert_no_path(astar.search(4.into(), 0.into(), null_heuristic)); // Cannot be reached
        assert_path(
            vec![0, 5, 7, 8, 9, 4],
            13.0,
            astar.search(0.into(), 4.into(), null_heuristic),
        );
        assert_path(
            vec![6, 3],
            20.0,
            astar.search_by_nodes(6.into(), 3.into(), straight_line),
        );
        assert_path(
            vec![4],
            0.0,
            astar.search_by_nodes(4.into(), 4.into(), straight_line),
        );
        assert_path(
            vec![1, 2, 3, 4],
            22.0,
            astar.search_by_nodes(1.into(), 4.into(), straight_line),
        );
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

        let mut astar = AStar::new(&g);

        assert_path(
            vec![0, 2, 3, 1],
            3.0,
            astar.search(0.into(), 1.into(), null_heuristic),
        );
    }

    #[test]
    fn table_guides_search() {
        let g = generate_diamond_graph();
        let (a, d) = (g.id_for("A").unwrap(), g.id_for("D").unwrap());
        let table = euclidean(&g, d);

        let mut dijkstra = Dijkstra::new(&g);
        let mut astar = AStar::new(&g);

        let sp_dijkstra = dijkstra.search(a, d).unwrap().unwrap();
        let sp_astar = astar.search_with_table(a, d, &table).unwrap().unwrap();

        assert_eq!(sp_dijkstra, sp_astar);
        assert!(astar.stats().nodes_settled <= dijkstra.stats().nodes_settled);
    }

    #[test]
    fn missing_table_entries_default_to_zero() {
        let g = generate_diamond_graph();
        let (a, d) = (g.id_for("A").unwrap(), g.id_for("D").unwrap());

        let mut astar = AStar::new(&g);
        assert_path(
            vec![0, 1, 3],
            2.0,
            astar.search_with_table(a, d, &HeuristicTable::default()),
        );
    }

    fn compare_with_dijkstra(g: &Graph, source: usize, target: usize) {
        let (source, target) = (node_index(source), node_index(target));
        let table = euclidean(g, target);

        let mut dijkstra = Dijkstra::new(g);
        let mut astar = AStar::new(g);

        let sp_dijkstra = dijkstra.search(source, target).unwrap();
        let sp_astar = astar.search_with_table(source, target, &table).unwrap();

        // a consistent heuristic never finds a cheaper way to a closed node
        assert_eq!(astar.stats().closed_improvements, 0);
        assert_eq!(dijkstra.stats().closed_improvements, 0);

        match (sp_dijkstra, sp_astar) {
            (Some(sp_dijkstra), Some(sp_astar)) => {
                assert_abs_diff_eq!(sp_dijkstra.weight, sp_astar.weight, epsilon = 1e-9);
                assert!(astar.stats().nodes_settled <= dijkstra.stats().nodes_settled);
            }
            (None, None) => {}
            (sp_dijkstra, sp_astar) => panic!(
                "Dijkstra and A* disagree: {:?} vs {:?}",
                sp_dijkstra, sp_astar
            ),
        }
    }

    #[test]
    fn astar_matches_dijkstra_on_random_graphs() {
        init_log();
        let mut runner = proptest::test_runner::TestRunner::default();

        runner
            .run(&(0..1000u64, 0..40usize, 0..40usize), |(seed, a, b)| {
                let g = random_geometric_graph(40, 90, seed);
                compare_with_dijkstra(&g, a, b);
                Ok(())
            })
            .unwrap();
    }
}
