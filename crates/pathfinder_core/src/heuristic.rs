//! Estimates of the remaining cost to a fixed goal.
//!
//! A table is only meaningful for the goal it was computed for. Neither the
//! table nor the search checks this.
use std::{fmt, path::Path};

use log::{debug, info, warn};

use crate::{
    constants::{Weight, AUDIT_TOLERANCE},
    error::SearchError,
    graph::{csv_reader, describe, field, Graph, Node, NodeIndex},
    search::dijkstra::Dijkstra,
    util::math::straight_line,
};

/// Which value column of a heuristic csv file to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeuristicColumn {
    /// Second column, usually the admissible estimate
    #[default]
    Primary,
    /// Third column, usually an inflated, inadmissible estimate
    Secondary,
}

impl HeuristicColumn {
    fn position(self) -> usize {
        match self {
            HeuristicColumn::Primary => 1,
            HeuristicColumn::Secondary => 2,
        }
    }
}

/// Estimate per node slot. Nodes without an entry are estimated with 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeuristicTable {
    values: Vec<Option<Weight>>,
}

impl HeuristicTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeIndex, value: Weight) {
        if self.values.len() <= node.index() {
            self.values.resize(node.index() + 1, None);
        }
        self.values[node.index()] = Some(value);
    }

    pub fn get(&self, node: NodeIndex) -> Option<Weight> {
        self.values.get(node.index()).copied().flatten()
    }

    pub fn estimate(&self, node: NodeIndex) -> Weight {
        self.get(node).unwrap_or(0.0)
    }

    /// Number of nodes with an entry
    pub fn len(&self) -> usize {
        self.values.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a table by evaluating `f` for every node of the graph.
    pub fn from_fn(g: &Graph, f: impl Fn(NodeIndex, &Node) -> Option<Weight>) -> Self {
        let mut table = HeuristicTable {
            values: vec![None; g.num_nodes()],
        };
        for node in g.nodes() {
            let node_idx = NodeIndex::new(node.id);
            table.values[node_idx.index()] = f(node_idx, node);
        }
        table
    }

    /// Reads `node,value[,secondary_value]` rows. The node is given by name
    /// or by id. Malformed rows and unknown names are skipped with a warning.
    pub fn from_csv(path: &Path, g: &Graph, column: HeuristicColumn) -> anyhow::Result<Self> {
        let mut table = HeuristicTable::new();

        let mut reader = csv_reader(path)?;
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    warn!("Skipping unreadable heuristic row: {}", err);
                    continue;
                }
            };

            let Some(key) = field(&record, 0) else {
                warn!("Skipping heuristic row without node {}", describe(&record));
                continue;
            };
            let node = match g.resolve(key) {
                Ok(node) => node,
                Err(err) => {
                    warn!("Skipping heuristic row {}: {}", describe(&record), err);
                    continue;
                }
            };
            let Some(value) =
                field(&record, column.position()).and_then(|v| v.parse::<Weight>().ok())
            else {
                warn!("Skipping malformed heuristic row {}", describe(&record));
                continue;
            };
            if value < 0.0 {
                warn!("Negative heuristic in row {}", describe(&record));
            }

            table.insert(node, value);
        }

        info!("Read {} heuristic values from {:?}", table.len(), path);
        Ok(table)
    }

    /// Compares the table against the exact remaining costs to `goal`.
    pub fn audit(&self, g: &Graph, goal: NodeIndex) -> Result<HeuristicAudit, SearchError> {
        let exact = Dijkstra::new(g).distances_to(goal)?;

        let mut audit = HeuristicAudit {
            goal_estimate: self.estimate(goal),
            ..Default::default()
        };

        for (idx, exact) in exact.iter().enumerate() {
            let node = NodeIndex::new(idx);
            let estimate = self.estimate(node);
            if exact.is_finite() {
                audit.checked_nodes += 1;
                let overestimate = estimate - exact;
                if overestimate > AUDIT_TOLERANCE * (1.0 + exact) {
                    audit.admissibility_violations += 1;
                }
                audit.max_overestimate = audit.max_overestimate.max(overestimate);
            }
        }

        for edge in g.edges() {
            let (from, to) = (self.estimate(edge.source), self.estimate(edge.target));
            let bound = edge.weight + to;
            if from > bound + AUDIT_TOLERANCE * (1.0 + bound) {
                audit.consistency_violations += 1;
            }
        }

        debug!("{}", audit);
        Ok(audit)
    }
}

/// Result of [`HeuristicTable::audit`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeuristicAudit {
    /// Estimate at the goal itself, has to be 0
    pub goal_estimate: Weight,
    /// Nodes that can reach the goal
    pub checked_nodes: usize,
    /// Nodes whose estimate exceeds their exact remaining cost
    pub admissibility_violations: usize,
    /// Arcs `(u, v, w)` with `h(u) > w + h(v)`
    pub consistency_violations: usize,
    /// Largest `h - h*` over all checked nodes, negative if never overestimated
    pub max_overestimate: Weight,
}

impl HeuristicAudit {
    pub fn is_admissible(&self) -> bool {
        self.admissibility_violations == 0 && self.goal_estimate == 0.0
    }

    pub fn is_consistent(&self) -> bool {
        self.consistency_violations == 0 && self.goal_estimate == 0.0
    }
}

impl fmt::Display for HeuristicAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h(goal) = {}, {} nodes checked: {} overestimated (max {:.3}), {} inconsistent arcs",
            self.goal_estimate,
            self.checked_nodes,
            self.admissibility_violations,
            self.max_overestimate,
            self.consistency_violations
        )
    }
}

/// Straight line distance to `goal`. Empty if the goal has no coordinates,
/// nodes without coordinates get no entry.
pub fn euclidean(g: &Graph, goal: NodeIndex) -> HeuristicTable {
    let Some(goal_node) = g.node(goal).filter(|node| node.coords.is_some()) else {
        warn!("Goal {:?} has no coordinates, falling back to zero heuristic", goal);
        return HeuristicTable::new();
    };

    HeuristicTable::from_fn(g, |_, node| {
        node.coords?;
        Some(straight_line(node, goal_node))
    })
}

/// Straight line distance, multiplied by `multiplier` for nodes in a
/// different cluster than the goal. Overestimates on purpose if
/// `multiplier > 1`. Nodes without cluster count as one cluster.
pub fn cluster_inflated(g: &Graph, goal: NodeIndex, multiplier: Weight) -> HeuristicTable {
    let base = euclidean(g, goal);
    let goal_cluster = g.node(goal).and_then(|node| node.cluster.as_deref());

    HeuristicTable::from_fn(g, |node_idx, node| {
        let estimate = base.get(node_idx)?;
        if node.cluster.as_deref() == goal_cluster {
            Some(estimate)
        } else {
            Some(estimate * multiplier)
        }
    })
}
