use crate::{constants::Weight, graph::NodeIndex};

#[derive(Debug, PartialEq, Clone)]
pub struct ShortestPath {
    pub nodes: Vec<NodeIndex>,
    pub weight: Weight,
}

impl ShortestPath {
    pub fn new(nodes: Vec<NodeIndex>, weight: Weight) -> Self {
        ShortestPath { nodes, weight }
    }

    /// Number of hops, 0 for a path that starts at its goal
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}
