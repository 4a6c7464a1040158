//! Re-exports of the most commonly used items in `pathfinder_core`.
pub use crate::error::{GraphError, Inconsistency, SearchError};
pub use crate::graph::{node_index, Edge, Graph, Node, NodeIndex};
pub use crate::heuristic::{cluster_inflated, euclidean, HeuristicColumn, HeuristicTable};

pub use crate::search;
pub use crate::search::astar::AStar;
pub use crate::search::best_first::SearchParams;
pub use crate::search::compare::{compare_heuristics, compare_heuristics_par, ComparisonRow};
pub use crate::search::dijkstra::Dijkstra;
pub use crate::search::report::SearchReport;
pub use crate::search::shortest_path::ShortestPath;

pub use crate::util::test_graphs::{generate_diamond_graph, generate_simple_graph};
