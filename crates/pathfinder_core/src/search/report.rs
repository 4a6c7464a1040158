use std::{fmt, time::Duration};

use crate::{
    constants::Weight,
    graph::{Graph, NodeIndex},
    statistics::SearchStats,
};

use super::shortest_path::ShortestPath;

/// Outcome of a search in a printable form. An empty `nodes` list means no
/// path was found.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub nodes: Vec<NodeIndex>,
    pub names: Vec<String>,
    pub cost: Option<Weight>,
    pub nodes_settled: usize,
    pub max_queue_len: usize,
    pub duration: Duration,
    pub limit_reached: bool,
}

impl SearchReport {
    pub fn new(g: &Graph, sp: Option<&ShortestPath>, stats: &SearchStats) -> Self {
        let nodes = sp.map(|sp| sp.nodes.clone()).unwrap_or_default();
        let names = nodes.iter().map(|node| g.label(*node)).collect();

        SearchReport {
            nodes,
            names,
            cost: sp.map(|sp| sp.weight),
            nodes_settled: stats.nodes_settled,
            max_queue_len: stats.max_queue_len,
            duration: stats.duration.unwrap_or_default(),
            limit_reached: stats.limit_reached,
        }
    }

    pub fn found(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Cost of the path, infinite if no path was found
    pub fn cost_or_inf(&self) -> Weight {
        self.cost.unwrap_or(Weight::INFINITY)
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found() {
            writeln!(f, "Path: {}", self.names.join(" -> "))?;
        } else if self.limit_reached {
            writeln!(f, "No path found within the expansion limit.")?;
        } else {
            writeln!(f, "No path found.")?;
        }

        let cost = match self.cost {
            Some(cost) => format!("{:.3}", cost),
            None => "unreachable".to_string(),
        };
        write!(
            f,
            "Cost: {} | Runtime: {:.3} ms | Expanded: {} | Max fringe: {}",
            cost,
            self.duration.as_secs_f64() * 1000.0,
            self.nodes_settled,
            self.max_queue_len
        )
    }
}
