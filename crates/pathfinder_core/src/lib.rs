//! Shortest paths with Dijkstra and A* on weighted graphs read from csv
//! files.
//!
//! Both algorithms share one best-first search. A* is steered by a
//! heuristic, usually a [`HeuristicTable`] computed for a fixed goal.
//!
//! # Basic usage
//! ```
//! use pathfinder_core::prelude::*;
//!
//! let g = generate_diamond_graph();
//! let (a, d) = (g.id_for("A").unwrap(), g.id_for("D").unwrap());
//!
//! // Straight line distance to the goal
//! let table = euclidean(&g, d);
//!
//! let mut astar = AStar::new(&g);
//! let sp = astar.search_with_table(a, d, &table).unwrap().expect("D is reachable");
//!
//! assert_eq!(sp.weight, 2.0);
//! println!("{}", SearchReport::new(&g, Some(&sp), astar.stats()));
//! ```
//! [`HeuristicTable`]: crate::heuristic::HeuristicTable
pub mod constants;
pub mod error;
pub mod graph;
pub mod heuristic;
pub mod prelude;
pub mod search;
pub mod statistics;
pub mod util;
