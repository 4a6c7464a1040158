use crate::{
    constants::Weight,
    error::{Inconsistency, SearchError},
    graph::{Graph, NodeIndex},
};

pub mod astar;
pub mod best_first;
pub mod compare;
pub mod dijkstra;
pub mod report;
pub mod shortest_path;

/// Walks the parent links from `target` back to `source` and returns the
/// path in `source -> target` order.
///
/// The walk is bounded by the number of node slots, so a corrupted parent
/// map that contains a cycle ends in an error instead of an endless loop.
pub fn reconstruct_path(
    parents: &[Option<NodeIndex>],
    source: NodeIndex,
    target: NodeIndex,
) -> Result<Vec<NodeIndex>, SearchError> {
    if source == target {
        return Ok(vec![source]);
    }

    let mut path = vec![target];
    let mut current = target;

    for _ in 0..parents.len() {
        match parents.get(current.index()).copied().flatten() {
            Some(prev) => {
                path.push(prev);
                if prev == source {
                    path.reverse();
                    return Ok(path);
                }
                current = prev;
            }
            None if current == target => {
                return Err(SearchError::Unreachable {
                    start: source,
                    goal: target,
                })
            }
            None => break,
        }
    }

    Err(Inconsistency::BrokenParentChain { target }.into())
}

/// Sums up the edge weights along `nodes`. Uses the cheapest arc if there are
/// parallel ones. Returns `None` for an empty path or if a hop has no arc.
pub fn path_cost(g: &Graph, nodes: &[NodeIndex]) -> Option<Weight> {
    if nodes.is_empty() {
        return None;
    }

    nodes.windows(2).try_fold(0.0, |cost, hop| {
        let weight = g
            .neighbors_outgoing(hop[0])
            .filter(|(_, edge)| edge.target == hop[1])
            .map(|(_, edge)| edge.weight)
            .min_by(|a, b| a.total_cmp(b))?;
        Some(cost + weight)
    })
}

/// Checks the settled cost of the goal against the sum over `nodes`. The two
/// only differ if the parent links do not match the relaxations that produced
/// `settled`.
pub fn verify_cost(g: &Graph, nodes: &[NodeIndex], settled: Weight) -> Result<Weight, SearchError> {
    let recomputed = path_cost(g, nodes).unwrap_or(Weight::INFINITY);
    if recomputed != settled {
        return Err(Inconsistency::CostMismatch {
            settled,
            recomputed,
        }
        .into());
    }
    Ok(settled)
}

#[cfg(test)]
pub(crate) fn assert_path(
    expected_path: Vec<usize>,
    expected_weight: Weight,
    path: Result<Option<shortest_path::ShortestPath>, SearchError>,
) {
    let expected_path = expected_path
        .into_iter()
        .map(crate::graph::node_index)
        .collect();
    assert_eq!(
        Ok(Some(shortest_path::ShortestPath::new(
            expected_path,
            expected_weight
        ))),
        path
    );
}

#[cfg(test)]
pub(crate) fn assert_no_path(path: Result<Option<shortest_path::ShortestPath>, SearchError>) {
    assert_eq!(Ok(None), path);
}
