//! Error types of the graph store and the search engine.
use thiserror::Error;

use crate::{constants::Weight, graph::NodeIndex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("no node named {0:?}")]
    NotFound(String),
    #[error("node id {0} is not part of the graph")]
    UnknownId(String),
}

/// Signals that the search state contradicts itself. Either the heuristic is
/// inconsistent/inadmissible or the parent links got corrupted.
#[derive(Debug, Error, PartialEq)]
pub enum Inconsistency {
    #[error("closed node {node:?} settled at {settled} was later reached with {found}")]
    ClosedNodeImproved {
        node: NodeIndex,
        settled: Weight,
        found: Weight,
    },
    #[error("parent chain of {target:?} does not lead back to the source")]
    BrokenParentChain { target: NodeIndex },
    #[error("path cost {recomputed} differs from settled cost {settled}")]
    CostMismatch { settled: Weight, recomputed: Weight },
}

#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("node {0:?} is not part of the graph")]
    UnknownNode(NodeIndex),
    #[error("no path from {start:?} to {goal:?}")]
    Unreachable { start: NodeIndex, goal: NodeIndex },
    #[error("inconsistent search state: {0}")]
    InconsistentState(#[from] Inconsistency),
}
